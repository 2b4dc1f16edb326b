use ring::digest::{Context, SHA256};

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_digest_is_deterministic() {
        let a = sha256_digest(b"genesis");
        let b = sha256_digest(b"genesis");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_sha256_digest_differs_on_input() {
        assert_ne!(sha256_digest(b"block-1"), sha256_digest(b"block-2"));
    }
}
