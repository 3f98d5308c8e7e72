use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

pub fn read_passphrase() -> Result<Zeroizing<String>> {
    //  Environment Variable
    //  SEALBOX_PASSPHRASE="supersecret" sealbox decrypt notes.txt.3dfx
    if let Ok(pw) = std::env::var("SEALBOX_PASSPHRASE") {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    //  stdin (Pipeline)
    //  printf "%s" "$SEALBOX_PASSPHRASE" | sealbox decrypt notes.txt.3dfx
    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_line(&mut buf)?;
        let pw = buf.trim_end().to_string();

        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    //  Interactive (TTY)
    if io::stdin().is_terminal() {
        let pw = rpassword::prompt_password("Passphrase: ")?;
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    bail!("No passphrase provided")
}

pub fn read_new_passphrase_with_confirmation() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("SEALBOX_PASSPHRASE") {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    if !io::stdin().is_terminal() {
        let stdin = io::stdin();
        let mut handle = stdin.lock();

        let mut pw1 = Zeroizing::new(String::new());
        let mut pw2 = Zeroizing::new(String::new());

        handle.read_line(&mut pw1)?;
        handle.read_line(&mut pw2)?;

        trim_newline(&mut pw1);
        trim_newline(&mut pw2);

        if pw1.is_empty() {
            bail!("passphrase cannot be empty");
        }

        if pw1 != pw2 {
            bail!("passphrases do not match");
        }

        return Ok(pw1);
    }

    let pw1 = rpassword::prompt_password("New passphrase: ")?;
    let pw2 = rpassword::prompt_password("Confirm passphrase: ")?;

    if pw1.is_empty() {
        bail!("passphrase cannot be empty");
    }

    if pw1 != pw2 {
        bail!("passphrases do not match");
    }

    Ok(Zeroizing::new(pw1))
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
