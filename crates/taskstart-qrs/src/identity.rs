use std::path::Path;
use taskstart_core::TaskStartError;

pub const CLIENT_CERT_FILE: &str = "client.pem";
pub const CLIENT_KEY_FILE: &str = "client_key.pem";
pub const ROOT_CERT_FILE: &str = "root.pem";

/// Certificates exported from the Qlik Management Console, read from one
/// directory.
#[derive(Debug, Clone)]
pub struct CertificateBundle {
    /// Client certificate followed by its private key, as one PEM buffer.
    pub identity_pem: Vec<u8>,
    pub root_pem: Option<Vec<u8>>,
}

impl CertificateBundle {
    pub fn load(dir: &Path) -> Result<Self, TaskStartError> {
        let mut identity_pem = read_pem(&dir.join(CLIENT_CERT_FILE))?;
        if !identity_pem.ends_with(b"\n") {
            identity_pem.push(b'\n');
        }
        identity_pem.extend(read_pem(&dir.join(CLIENT_KEY_FILE))?);

        let root_path = dir.join(ROOT_CERT_FILE);
        let root_pem = if root_path.exists() {
            Some(read_pem(&root_path)?)
        } else {
            None
        };

        Ok(Self {
            identity_pem,
            root_pem,
        })
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, TaskStartError> {
    std::fs::read(path).map_err(|e| {
        TaskStartError::Config(format!("cannot read certificate {}: {}", path.display(), e))
    })
}
