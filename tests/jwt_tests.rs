use wasit_backend::config::jwt_conf::JwtConfig;
use wasit_backend::util::jwt::*;

fn create_test_jwt_utils() -> JwtTokenUtilsImpl {
    JwtTokenUtilsImpl::new(JwtConfig::default())
}

struct TestUser {
    id: String,
    email: String,
    role: String,
}

impl TestUser {
    fn customer() -> Self {
        Self {
            id: "64b7f3a2e4b0f5a1d2c3b4a5".to_string(),
            email: "customer@example.com".to_string(),
            role: "customer".to_string(),
        }
    }

    fn admin() -> Self {
        Self {
            id: "64b7f3a2e4b0f5a1d2c3b4a6".to_string(),
            email: "admin@example.com".to_string(),
            role: "admin".to_string(),
        }
    }
}

#[test]
fn test_jwt_utils_creation() {
    let jwt_utils = create_test_jwt_utils();
    assert!(!jwt_utils.jwt_config.jwt_secret.is_empty());
    assert!(jwt_utils.jwt_config.access_token_expiration > 0);
    assert!(jwt_utils.jwt_config.refresh_token_expiration > 0);
}

#[test]
fn test_token_type_as_str() {
    assert_eq!(TokenType::Access.as_str(), "access");
    assert_eq!(TokenType::Refresh.as_str(), "refresh");
}

#[test]
fn test_generate_and_validate_access_token() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::customer();

    let token = jwt_utils
        .generate_access_token(&user.id, &user.email, &user.role)
        .expect("token generation");
    assert!(!token.is_empty());

    let claims = jwt_utils
        .validate_access_token(&token)
        .expect("token validation");
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.email, user.email);
    assert_eq!(claims.role, user.role);
    assert_eq!(claims.token_type, "access");
}

#[test]
fn test_refresh_token_rejected_as_access() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::customer();

    let refresh = jwt_utils
        .generate_refresh_token(&user.id, &user.email, &user.role)
        .expect("refresh generation");

    let result = jwt_utils.validate_access_token(&refresh);
    assert!(matches!(
        result,
        Err(JwtError::InvalidTokenType { .. })
    ));
}

#[test]
fn test_generate_token_pair() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::admin();

    let pair = jwt_utils
        .generate_token_pair(&user.id, &user.email, &user.role)
        .expect("pair generation");
    assert!(!pair.access_token.is_empty());
    assert!(!pair.refresh_token.is_empty());
    assert_ne!(pair.access_token, pair.refresh_token);
    assert_eq!(pair.token_type, "Bearer");
    assert_eq!(
        pair.expires_in,
        jwt_utils.jwt_config.access_token_expiration * 60
    );

    jwt_utils
        .validate_access_token(&pair.access_token)
        .expect("access half validates");
    jwt_utils
        .validate_refresh_token(&pair.refresh_token)
        .expect("refresh half validates");
}

#[test]
fn test_validate_garbage_token_fails() {
    let jwt_utils = create_test_jwt_utils();
    assert!(jwt_utils.validate_access_token("not-a-jwt").is_err());
    assert!(jwt_utils.validate_access_token("").is_err());
}

#[test]
fn test_validate_token_with_wrong_secret_fails() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::customer();
    let token = jwt_utils
        .generate_access_token(&user.id, &user.email, &user.role)
        .expect("token generation");

    let mut other_config = JwtConfig::default();
    other_config.jwt_secret = "a-completely-different-secret-of-enough-length".to_string();
    let other_utils = JwtTokenUtilsImpl::new(other_config);
    assert!(other_utils.validate_access_token(&token).is_err());
}

#[test]
fn test_extract_token_from_header() {
    let jwt_utils = create_test_jwt_utils();

    let token = jwt_utils
        .extract_token_from_header("Bearer abc.def.ghi")
        .expect("extraction");
    assert_eq!(token, "abc.def.ghi");

    assert!(jwt_utils.extract_token_from_header("Basic abc").is_err());
    assert!(jwt_utils.extract_token_from_header("Bearer ").is_err());
    assert!(jwt_utils.extract_token_from_header("").is_err());
}

#[test]
fn test_check_role_permission() {
    let jwt_utils = create_test_jwt_utils();

    assert!(jwt_utils.check_role_permission("customer", "customer"));
    assert!(jwt_utils.check_role_permission("provider", "provider"));
    assert!(!jwt_utils.check_role_permission("customer", "provider"));
    assert!(!jwt_utils.check_role_permission("provider", "customer"));

    // Admin passes every gate.
    assert!(jwt_utils.check_role_permission("admin", "customer"));
    assert!(jwt_utils.check_role_permission("admin", "provider"));
    assert!(jwt_utils.check_role_permission("admin", "admin"));
}
