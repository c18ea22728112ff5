use formation::formation_core::password::{generate_password, hash_password, verify_password};

#[test]
fn test_hash_password_success() {
    let password = "testpassword123";
    let result = hash_password(password);

    assert!(result.is_ok());
    let hash = result.unwrap();
    assert!(!hash.is_empty());
    assert_ne!(hash, password);
}

#[test]
fn test_verify_password_correct() {
    let password = "correctpassword";
    let hash = hash_password(password).unwrap();

    let result = verify_password(password, &hash);

    assert!(result.is_ok());
    assert!(result.unwrap());
}

#[test]
fn test_verify_password_incorrect() {
    let password = "correctpassword";
    let hash = hash_password(password).unwrap();

    let result = verify_password("wrongpassword", &hash);

    assert!(result.is_ok());
    assert!(!result.unwrap());
}

#[test]
fn test_verify_password_invalid_hash() {
    let result = verify_password("testpassword", "not_a_valid_bcrypt_hash");

    assert!(result.is_err());
}

#[test]
fn test_hash_generates_unique_hashes() {
    let password = "samepassword";
    let hash1 = hash_password(password).unwrap();
    let hash2 = hash_password(password).unwrap();

    assert_ne!(hash1, hash2);
    assert!(verify_password(password, &hash1).unwrap());
    assert!(verify_password(password, &hash2).unwrap());
}

#[test]
fn test_generate_password_length() {
    assert_eq!(generate_password(12).len(), 12);
    assert_eq!(generate_password(20).len(), 20);
}

#[test]
fn test_generate_password_enforces_minimum_length() {
    assert_eq!(generate_password(0).len(), 8);
    assert_eq!(generate_password(5).len(), 8);
}

#[test]
fn test_generate_password_character_classes() {
    for _ in 0..20 {
        let password = generate_password(12);
        assert!(password.chars().any(|c| c.is_ascii_lowercase()));
        assert!(password.chars().any(|c| c.is_ascii_uppercase()));
        assert!(password.chars().any(|c| c.is_ascii_digit()));
    }
}

#[test]
fn test_generate_password_excludes_ambiguous_characters() {
    for _ in 0..20 {
        let password = generate_password(32);
        for forbidden in ['0', 'O', '1', 'l', 'I'] {
            assert!(
                !password.contains(forbidden),
                "password {} contains ambiguous character {}",
                password,
                forbidden
            );
        }
    }
}

#[test]
fn test_generate_password_is_random() {
    let a = generate_password(16);
    let b = generate_password(16);
    assert_ne!(a, b);
}
