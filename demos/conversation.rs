//! Bob encrypts messages for Alice with a freshly generated key pair.
//!
//! The keys are written to `RSAPublicKey.txt` / `RSAPrivateKey.txt` in the
//! current directory and read back for every message. Set `RUST_LOG=debug`
//! to watch key generation.

use std::io::{self, BufRead, Write};

use textbook_rsa::{
    generate_keypair,
    storage::{FileKeyStore, KeyStore},
    Error, DEFAULT_PRIME_BITS,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut store = FileKeyStore::default();
    {
        let (public_key, private_key) = generate_keypair(DEFAULT_PRIME_BITS)?;
        store.save_keypair(&public_key, &private_key)?;
    }

    let max_len = store.load_public_key()?.max_message_len();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Bob - Insert Message (at most {} bytes): ", max_len);
        io::stdout().flush()?;
        let Some(message) = lines.next().transpose()? else {
            break;
        };

        println!("Bob - encrypting message...");
        let public_key = store.load_public_key()?;
        let ciphertext = match public_key.encrypt(message.as_bytes()) {
            Ok(ciphertext) => ciphertext,
            Err(Error::MessageEmpty) => {
                eprintln!("Message must have at least one byte.");
                continue;
            }
            Err(Error::MessageTooLong) => {
                eprintln!(
                    "Message has {} bytes. Maximum amount is {}.",
                    message.len(),
                    max_len
                );
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        println!("Message encrypted and sent to Alice: {}", ciphertext);
        println!("---");

        println!("Alice receives the ciphertext from Bob and decrypts it...");
        let private_key = store.load_private_key()?;
        let plaintext = private_key.decrypt(&ciphertext)?;
        println!(
            "Alice sees the message in plaintext: \"{}\"",
            String::from_utf8_lossy(&plaintext)
        );
        println!("---");

        print!("Try again? Type 0 to exit or anything else to continue: ");
        io::stdout().flush()?;
        match lines.next().transpose()? {
            Some(option) if option.trim() != "0" => {}
            _ => break,
        }
    }

    println!("Exiting...");
    Ok(())
}
