use std::env;

use anyhow::{anyhow, Result};

fn main() -> Result<()> {
    let (subject, admin) = parse_args()?;
    let token = coursehub_api::issue_token(&subject, admin)?;
    println!("{token}");
    Ok(())
}

fn parse_args() -> Result<(String, bool)> {
    let mut subject = None;
    let mut admin = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--admin" => admin = true,
            "-h" | "--help" => {
                return Err(anyhow!("usage: issue_token <user-id> [--admin]"));
            }
            value if subject.is_none() => subject = Some(value.to_string()),
            value => return Err(anyhow!("unexpected argument: {value}")),
        }
    }

    let subject = subject.ok_or_else(|| anyhow!("usage: issue_token <user-id> [--admin]"))?;
    if subject.trim().is_empty() {
        return Err(anyhow!("user id must not be empty"));
    }

    Ok((subject, admin))
}
