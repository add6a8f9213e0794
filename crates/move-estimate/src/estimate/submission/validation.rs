use serde::Serialize;

use crate::estimate::domain::EstimateFormData;

const MAX_NAME_LENGTH: usize = 100;
const MIN_PHONE_DIGITS: usize = 7;

/// One rejected field, reported back to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Checks applied to a lead before it is accepted. Stricter than the wizard
/// gating, which only looks for presence.
pub fn validate_submission(form: &EstimateFormData) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    if form.from_address.trim().is_empty() {
        issues.push(FieldIssue::new("fromAddress", "Origin address is required"));
    } else if form.from_coordinates.is_none() {
        issues.push(FieldIssue::new(
            "fromCoordinates",
            "Origin address must be selected from suggestions",
        ));
    }

    if form.to_address.trim().is_empty() {
        issues.push(FieldIssue::new("toAddress", "Destination address is required"));
    } else if form.to_coordinates.is_none() {
        issues.push(FieldIssue::new(
            "toCoordinates",
            "Destination address must be selected from suggestions",
        ));
    }

    if form.selected_size().is_none() {
        issues.push(FieldIssue::new("moveSize", "Move size is required"));
    }
    if form.move_date.is_none() {
        issues.push(FieldIssue::new("moveDate", "Move date is required"));
    }

    let name = form.full_name.trim();
    if name.is_empty() {
        issues.push(FieldIssue::new("fullName", "Full name is required"));
    } else if name.chars().count() > MAX_NAME_LENGTH {
        issues.push(FieldIssue::new("fullName", "Full name too long"));
    }

    if !looks_like_email(&form.email) {
        issues.push(FieldIssue::new("email", "Invalid email address"));
    }

    let digits = form.phone.chars().filter(char::is_ascii_digit).count();
    if digits < MIN_PHONE_DIGITS {
        issues.push(FieldIssue::new("phone", "Phone number is required"));
    }

    issues
}

fn looks_like_email(raw: &str) -> bool {
    let value = raw.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .map(|(host, rest)| !host.is_empty() && !rest.is_empty() && !rest.ends_with('.'))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::domain::Coordinates;
    use chrono::NaiveDate;

    fn complete_form() -> EstimateFormData {
        EstimateFormData {
            from_address: "123 Main St, Washington, DC".to_string(),
            from_coordinates: Coordinates::new(38.9072, -77.0365).ok(),
            to_address: "456 Oak Ave, Arlington, VA".to_string(),
            to_coordinates: Coordinates::new(38.8799, -77.1060).ok(),
            move_date: NaiveDate::from_ymd_opt(2025, 3, 11),
            full_name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            phone: "(202) 555-0100".to_string(),
            ..EstimateFormData::default()
        }
    }

    fn fields(issues: &[FieldIssue]) -> Vec<&'static str> {
        issues.iter().map(|issue| issue.field).collect()
    }

    #[test]
    fn complete_form_passes() {
        assert!(validate_submission(&complete_form()).is_empty());
    }

    #[test]
    fn free_typed_address_is_rejected() {
        let mut form = complete_form();
        form.to_coordinates = None;
        assert_eq!(fields(&validate_submission(&form)), vec!["toCoordinates"]);
    }

    #[test]
    fn email_shape_is_checked() {
        for bad in ["", "jane", "jane@", "@example.com", "jane@example", "jane doe@example.com", "a@b@c.com"] {
            let mut form = complete_form();
            form.email = bad.to_string();
            assert_eq!(fields(&validate_submission(&form)), vec!["email"], "{bad}");
        }
    }

    #[test]
    fn reports_every_missing_field() {
        let form = EstimateFormData {
            move_size: None,
            ..EstimateFormData::default()
        };
        assert_eq!(
            fields(&validate_submission(&form)),
            vec!["fromAddress", "toAddress", "moveSize", "moveDate", "fullName", "email", "phone"]
        );
    }
}
