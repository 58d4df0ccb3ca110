//! Persistence of key material.
//!
//! Keys are stored in the `"<e> <n>"` / `"<d> <n>"` decimal text form, one
//! key per record. [`FileKeyStore`] keeps them in two files, [`MemoryKeyStore`]
//! keeps them in memory.

use std::fs;
use std::path::{Path, PathBuf};
use std::string::{String, ToString};

use log::debug;
use zeroize::Zeroizing;

use crate::errors::{Error, Result};
use crate::key::{RsaPrivateKey, RsaPublicKey};

/// Default location of the public key.
pub const DEFAULT_PUBLIC_KEY_PATH: &str = "RSAPublicKey.txt";

/// Default location of the private key.
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "RSAPrivateKey.txt";

/// Somewhere a key pair can be written to and read back from.
pub trait KeyStore {
    /// Stores the public key, replacing any previous one.
    fn save_public_key(&mut self, key: &RsaPublicKey) -> Result<()>;

    /// Stores the private key, replacing any previous one.
    fn save_private_key(&mut self, key: &RsaPrivateKey) -> Result<()>;

    /// Loads the stored public key.
    fn load_public_key(&self) -> Result<RsaPublicKey>;

    /// Loads the stored private key.
    fn load_private_key(&self) -> Result<RsaPrivateKey>;

    /// Stores both halves of a key pair.
    fn save_keypair(&mut self, public_key: &RsaPublicKey, private_key: &RsaPrivateKey) -> Result<()> {
        self.save_public_key(public_key)?;
        self.save_private_key(private_key)
    }
}

/// Stores each key as a single line of text in its own file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileKeyStore {
    public_key_path: PathBuf,
    private_key_path: PathBuf,
}

impl Default for FileKeyStore {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_KEY_PATH, DEFAULT_PRIVATE_KEY_PATH)
    }
}

impl FileKeyStore {
    /// Uses the given files for the public and the private key.
    pub fn new(public_key_path: impl Into<PathBuf>, private_key_path: impl Into<PathBuf>) -> Self {
        Self {
            public_key_path: public_key_path.into(),
            private_key_path: private_key_path.into(),
        }
    }

    /// Uses the default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(
            dir.join(DEFAULT_PUBLIC_KEY_PATH),
            dir.join(DEFAULT_PRIVATE_KEY_PATH),
        )
    }

    /// Path of the public key file.
    pub fn public_key_path(&self) -> &Path {
        &self.public_key_path
    }

    /// Path of the private key file.
    pub fn private_key_path(&self) -> &Path {
        &self.private_key_path
    }
}

impl KeyStore for FileKeyStore {
    fn save_public_key(&mut self, key: &RsaPublicKey) -> Result<()> {
        debug!("writing public key to {}", self.public_key_path.display());
        fs::write(&self.public_key_path, format!("{}\n", key))?;
        Ok(())
    }

    fn save_private_key(&mut self, key: &RsaPrivateKey) -> Result<()> {
        debug!("writing private key to {}", self.private_key_path.display());
        let mut text = key.to_text();
        text.push('\n');
        fs::write(&self.private_key_path, text.as_bytes())?;
        Ok(())
    }

    fn load_public_key(&self) -> Result<RsaPublicKey> {
        fs::read_to_string(&self.public_key_path)?.parse()
    }

    fn load_private_key(&self) -> Result<RsaPrivateKey> {
        let text = Zeroizing::new(fs::read_to_string(&self.private_key_path)?);
        text.parse()
    }
}

/// Keeps the text form of each key in memory.
#[derive(Default)]
pub struct MemoryKeyStore {
    public_key: Option<String>,
    private_key: Option<Zeroizing<String>>,
}

impl MemoryKeyStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryKeyStore {
    fn save_public_key(&mut self, key: &RsaPublicKey) -> Result<()> {
        self.public_key = Some(key.to_string());
        Ok(())
    }

    fn save_private_key(&mut self, key: &RsaPrivateKey) -> Result<()> {
        self.private_key = Some(key.to_text());
        Ok(())
    }

    fn load_public_key(&self) -> Result<RsaPublicKey> {
        self.public_key
            .as_deref()
            .ok_or(Error::KeyStorage(std::io::ErrorKind::NotFound))?
            .parse()
    }

    fn load_private_key(&self) -> Result<RsaPrivateKey> {
        self.private_key
            .as_deref()
            .ok_or(Error::KeyStorage(std::io::ErrorKind::NotFound))?
            .parse()
    }
}
