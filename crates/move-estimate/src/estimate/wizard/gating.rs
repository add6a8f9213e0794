use super::steps::WizardStep;
use crate::estimate::domain::EstimateFormData;

/// Whether the data collected so far lets the user leave `step` forwards.
///
/// Only presence is checked here; field formats such as email shape are
/// validated when the estimate is submitted.
pub fn can_advance(step: WizardStep, form: &EstimateFormData) -> bool {
    match step {
        WizardStep::MoveType => true,
        WizardStep::Locations => {
            !form.from_address.trim().is_empty()
                && !form.to_address.trim().is_empty()
                && form.from_coordinates.is_some()
                && form.to_coordinates.is_some()
        }
        WizardStep::Size => form.selected_size().is_some(),
        WizardStep::Date => form.move_date.is_some(),
        WizardStep::Contact => {
            !form.full_name.is_empty() && !form.email.is_empty() && !form.phone.is_empty()
        }
        WizardStep::Summary => false,
    }
}
