use anyhow::Result;
use clap::{Args, ValueEnum};
use resolver::{normalize_email, normalize_name, normalize_phone};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyKind {
    Phone,
    Email,
    Name,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Which comparison key to compute
    #[arg(value_enum)]
    pub kind: KeyKind,

    pub value: String,
}

pub fn run(args: &NormalizeArgs) -> Result<()> {
    let key = normalize(args.kind, &args.value);
    if key.is_empty() {
        tracing::warn!("{:?} yields no comparison key", args.value);
    }
    println!("{}", key);
    Ok(())
}

pub fn normalize(kind: KeyKind, value: &str) -> String {
    match kind {
        KeyKind::Phone => normalize_phone(value),
        KeyKind::Email => normalize_email(value),
        KeyKind::Name => normalize_name(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dispatch() {
        assert_eq!(normalize(KeyKind::Phone, "+1 (555) 123-4567"), "551234567");
        assert_eq!(normalize(KeyKind::Email, "J.Doe+x@GoogleMail.com"), "jdoe@gmail.com");
        assert_eq!(normalize(KeyKind::Name, "Dr. José  García Jr."), "jose garcia");
        assert_eq!(normalize(KeyKind::Phone, "12345"), "");
    }
}
