use chrono::{NaiveDate, Utc};
use habit_tracker::models::{
    Board, BoardDetails, CheckIn, CreateBoardRequest, CreateCheckInRequest, LoginRequest,
    Normalize, RegisterRequest, UpdateBoardRequest, UpdateCheckInRequest, UpdateUserRequest,
    User, UserProfile,
};
use validator::Validate;

fn register(password: &str) -> RegisterRequest {
    RegisterRequest {
        full_name: Some("Ada Lovelace".to_string()),
        email: "ada@example.com".to_string(),
        password: password.to_string(),
    }
}

// --- Request validation ---

#[test]
fn test_register_accepts_strong_password() {
    assert!(register("Analytical1!Engine").validate().is_ok());
}

#[test]
fn test_register_rejects_weak_passwords() {
    for weak in [
        "Short1!",              // too short
        "alllowercase1!",       // no upper
        "ALLUPPERCASE1!",       // no lower
        "NoDigitsHere!!",       // no digit
        "NoSpecials1234",       // no special
        "Has Space1!Inside",    // outside the allowed alphabet
    ] {
        let errors = register(weak).validate().unwrap_err();
        assert!(
            errors.field_errors().contains_key("password"),
            "{weak:?} should be rejected"
        );
    }
}

#[test]
fn test_register_normalizes_email_and_name() {
    let req = RegisterRequest {
        full_name: Some("   ".to_string()),
        email: "  Ada@Example.COM ".to_string(),
        password: "Analytical1!Engine".to_string(),
    }
    .normalize();

    assert_eq!(req.email, "ada@example.com");
    assert_eq!(req.full_name, None);
    assert!(req.validate().is_ok());
}

#[test]
fn test_login_requires_valid_email() {
    let req = LoginRequest {
        email: "not-an-email".to_string(),
        password: "Analytical1!Engine".to_string(),
    };
    let errors = req.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("email"));
}

#[test]
fn test_board_name_is_trimmed_before_validation() {
    let req = CreateBoardRequest {
        name: "   ".to_string(),
        ..Default::default()
    }
    .normalize();
    assert!(req.validate().is_err());

    let req = CreateBoardRequest {
        name: "  Water ".to_string(),
        ..Default::default()
    }
    .normalize();
    assert_eq!(req.name, "Water");
    assert!(req.validate().is_ok());
}

#[test]
fn test_board_update_only_checks_present_fields() {
    assert!(UpdateBoardRequest::default().validate().is_ok());

    let too_long = UpdateBoardRequest {
        name: Some("x".repeat(256)),
        ..Default::default()
    };
    assert!(too_long.validate().is_err());
}

#[test]
fn test_user_update_rejects_bad_email() {
    let req = UpdateUserRequest {
        email: Some("nope".to_string()),
        ..Default::default()
    };
    assert!(req.validate().is_err());
}

/// 64 + 1 + 195 characters: a syntactically valid address longer than the
/// `users.email` column.
fn oversized_email() -> String {
    format!(
        "{}@{}.{}.{}.com",
        "a".repeat(64),
        "b".repeat(63),
        "c".repeat(63),
        "d".repeat(63)
    )
}

#[test]
fn test_emails_longer_than_column_are_rejected() {
    let email = oversized_email();
    assert_eq!(email.len(), 260);

    let register = RegisterRequest {
        email: email.clone(),
        ..register("Analytical1!Engine")
    };
    assert!(register.validate().unwrap_err().field_errors().contains_key("email"));

    let login = LoginRequest {
        email: email.clone(),
        password: "Analytical1!Engine".to_string(),
    };
    assert!(login.validate().unwrap_err().field_errors().contains_key("email"));

    let update = UpdateUserRequest {
        email: Some(email),
        ..Default::default()
    };
    assert!(update.validate().unwrap_err().field_errors().contains_key("email"));
}

#[test]
fn test_check_in_unit_lengths_match_columns() {
    let base = || CreateCheckInRequest {
        board_id: 1,
        check_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        notes: None,
        completed: None,
        value: Some(2.0),
        unit: Some("x".repeat(50)),
        unit_symbol: Some("x".repeat(20)),
    };
    assert!(base().validate().is_ok());

    let errors = CreateCheckInRequest {
        unit: Some("x".repeat(51)),
        ..base()
    }
    .validate()
    .unwrap_err();
    assert!(errors.field_errors().contains_key("unit"));

    let errors = CreateCheckInRequest {
        unit_symbol: Some("x".repeat(21)),
        ..base()
    }
    .validate()
    .unwrap_err();
    assert!(errors.field_errors().contains_key("unit_symbol"));

    let update = UpdateCheckInRequest {
        unit: Some("x".repeat(51)),
        unit_symbol: Some("x".repeat(21)),
        ..Default::default()
    };
    let errors = update.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("unit"));
    assert!(errors.field_errors().contains_key("unit_symbol"));
}

// --- Wire format ---

#[test]
fn test_create_check_in_parses_camel_case_body() {
    let req: CreateCheckInRequest = serde_json::from_value(serde_json::json!({
        "boardId": 7,
        "checkDate": "2025-03-01",
        "unitSymbol": "gl"
    }))
    .unwrap();

    assert_eq!(req.board_id, 7);
    assert_eq!(req.check_date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    assert_eq!(req.completed, None);
    assert_eq!(req.unit_symbol.as_deref(), Some("gl"));
    assert!(req.validate().is_ok());
}

#[test]
fn test_create_check_in_rejects_non_positive_board_id() {
    let req: CreateCheckInRequest = serde_json::from_value(serde_json::json!({
        "boardId": 0,
        "checkDate": "2025-03-01"
    }))
    .unwrap();
    assert!(req.validate().unwrap_err().field_errors().contains_key("board_id"));
}

#[test]
fn test_user_profile_never_exposes_password() {
    let user = User {
        id: 1,
        email: "ada@example.com".to_string(),
        full_name: None,
        password: "$argon2id$secret".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let json = serde_json::to_string(&UserProfile::from(user)).unwrap();
    assert!(!json.contains("argon2"));
    assert!(!json.contains("password"));
    assert!(json.contains("\"fullName\""));
}

#[test]
fn test_board_details_flattens_board_fields() {
    let details = BoardDetails {
        board: Board {
            id: 3,
            name: "Water".to_string(),
            is_quantity: true,
            default_value: Some(8.0),
            ..Default::default()
        },
        check_ins: vec![CheckIn {
            id: 9,
            board_id: 3,
            value: Some(8.0),
            ..Default::default()
        }],
    };
    let json = serde_json::to_value(details).unwrap();

    assert_eq!(json["id"], 3);
    assert_eq!(json["isQuantity"], true);
    assert_eq!(json["defaultValue"], 8.0);
    assert_eq!(json["checkIns"][0]["boardId"], 3);
    assert_eq!(json["checkIns"][0]["checkDate"], "1970-01-01");
}
