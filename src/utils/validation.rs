use crate::errors::{AppError, Result};
use regex::Regex;

pub struct Validator;

impl Validator {
    pub fn validate_email(email: &str) -> Result<()> {
        let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .map_err(|e| AppError::InternalError(format!("Regex error: {}", e)))?;

        if !email_regex.is_match(email) {
            return Err(AppError::ValidationError("Invalid email format".to_string()));
        }

        if email.len() > 254 {
            return Err(AppError::ValidationError("Email too long".to_string()));
        }

        Ok(())
    }

    pub fn validate_password(password: &str) -> Result<()> {
        if password.len() < 8 {
            return Err(AppError::ValidationError("Password must be at least 8 characters long".to_string()));
        }

        if password.len() > 128 {
            return Err(AppError::ValidationError("Password must be less than 128 characters".to_string()));
        }

        let has_uppercase = password.chars().any(|c| c.is_uppercase());
        let has_lowercase = password.chars().any(|c| c.is_lowercase());
        let has_digit = password.chars().any(|c| c.is_numeric());
        let has_special = password.chars().any(|c| "!@#$%^&*()_+-=[]{}|;:,.<>?".contains(c));

        if !has_uppercase {
            return Err(AppError::ValidationError("Password must contain at least one uppercase letter".to_string()));
        }

        if !has_lowercase {
            return Err(AppError::ValidationError("Password must contain at least one lowercase letter".to_string()));
        }

        if !has_digit {
            return Err(AppError::ValidationError("Password must contain at least one digit".to_string()));
        }

        if !has_special {
            return Err(AppError::ValidationError("Password must contain at least one special character".to_string()));
        }

        Ok(())
    }

    pub fn validate_person_name(field: &str, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError(format!("{} is required", field)));
        }
        if name.len() > 50 {
            return Err(AppError::ValidationError(format!("{} must be less than 50 characters", field)));
        }
        Ok(())
    }

    pub fn validate_company_name(name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("Company name is required".to_string()));
        }
        if name.len() > 100 {
            return Err(AppError::ValidationError("Company name must be less than 100 characters".to_string()));
        }
        Ok(())
    }

    pub fn validate_user_role(role: &str) -> Result<()> {
        const ROLES: &[&str] = &["founder", "co-founder", "ceo", "cto", "consultant", "investor", "other"];
        if !ROLES.contains(&role) {
            return Err(AppError::ValidationError(format!(
                "Role must be one of: {}",
                ROLES.join(", ")
            )));
        }
        Ok(())
    }

    pub fn validate_theme_choice(theme: &str) -> Result<()> {
        if theme != "light" && theme != "dark" {
            return Err(AppError::ValidationError("Theme must be 'light' or 'dark'".to_string()));
        }
        Ok(())
    }

    pub fn validate_deck_title(title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::ValidationError("Title is required".to_string()));
        }
        if title.len() > 200 {
            return Err(AppError::ValidationError("Title must be less than 200 characters".to_string()));
        }
        Ok(())
    }

    pub fn validate_investor_name(name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("Name is required".to_string()));
        }
        if name.len() > 100 {
            return Err(AppError::ValidationError("Name must be less than 100 characters".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_email() {
        assert!(Validator::validate_email("founder@example.com").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(Validator::validate_email("not-an-email").is_err());
        assert!(Validator::validate_email("missing@tld").is_err());
        assert!(Validator::validate_email("@example.com").is_err());
    }

    #[test]
    fn password_requires_all_character_classes() {
        assert!(Validator::validate_password("Str0ng!pass").is_ok());
        assert!(Validator::validate_password("short1!").is_err());
        assert!(Validator::validate_password("nouppercase1!").is_err());
        assert!(Validator::validate_password("NOLOWERCASE1!").is_err());
        assert!(Validator::validate_password("NoDigits!!").is_err());
        assert!(Validator::validate_password("NoSpecial11").is_err());
    }

    #[test]
    fn role_must_come_from_known_list() {
        assert!(Validator::validate_user_role("founder").is_ok());
        assert!(Validator::validate_user_role("co-founder").is_ok());
        assert!(Validator::validate_user_role("janitor").is_err());
    }

    #[test]
    fn deck_title_rejects_blank_and_oversized() {
        assert!(Validator::validate_deck_title("Series A Deck").is_ok());
        assert!(Validator::validate_deck_title("   ").is_err());
        assert!(Validator::validate_deck_title(&"x".repeat(201)).is_err());
    }
}
