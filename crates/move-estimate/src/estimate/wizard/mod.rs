//! Multi-step estimate wizard.
//!
//! The wizard owns the form record, walks a fixed step sequence one step at a
//! time, and refreshes the derived distance/price estimate after every edit by
//! calling [`recompute`] explicitly.

mod derived;
mod gating;
mod steps;

pub use derived::{recompute, DerivedEstimate};
pub use gating::can_advance;
pub use steps::WizardStep;

use super::address::{AddressRevision, AddressTarget, PlaceResult, RevisionCounter, ServiceArea};
use super::domain::{EstimateFormData, MoveSize, MoveType};
use super::pricing::{PricingPolicy, PricingPolicyKind};
use super::submission::EstimateSubmission;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Single-field edit coming from the UI. Address text and coordinates are not
/// listed: they only change through [`EstimateWizard::select_address`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldUpdate {
    MoveType(MoveType),
    MoveSize(Option<MoveSize>),
    MoveDate(Option<NaiveDate>),
    #[serde(with = "crate::estimate::domain::clock_time")]
    MoveTime(Option<NaiveTime>),
    HasSpecialItems(bool),
    NeedsPacking(bool),
    NeedsStorage(bool),
    HasElevator(bool),
    FullName(String),
    Email(String),
    Phone(String),
}

impl FieldUpdate {
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MoveType(_) => "moveType",
            Self::MoveSize(_) => "moveSize",
            Self::MoveDate(_) => "moveDate",
            Self::MoveTime(_) => "moveTime",
            Self::HasSpecialItems(_) => "hasSpecialItems",
            Self::NeedsPacking(_) => "needsPacking",
            Self::NeedsStorage(_) => "needsStorage",
            Self::HasElevator(_) => "hasElevator",
            Self::FullName(_) => "fullName",
            Self::Email(_) => "email",
            Self::Phone(_) => "phone",
        }
    }

    /// Merges the value into `form` without validating it.
    pub fn apply(self, form: &mut EstimateFormData) {
        match self {
            Self::MoveType(value) => form.move_type = value,
            Self::MoveSize(value) => form.move_size = value,
            Self::MoveDate(value) => form.move_date = value,
            Self::MoveTime(value) => form.move_time = value,
            Self::HasSpecialItems(value) => form.has_special_items = value,
            Self::NeedsPacking(value) => form.needs_packing = value,
            Self::NeedsStorage(value) => form.needs_storage = value,
            Self::HasElevator(value) => form.has_elevator = value,
            Self::FullName(value) => form.full_name = value,
            Self::Email(value) => form.email = value,
            Self::Phone(value) => form.phone = value,
        }
    }
}

/// Result of a Next/Back request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Navigation {
    Moved { from: WizardStep, to: WizardStep },
    /// The current step's data is incomplete.
    Blocked { step: WizardStep },
    /// No step exists in the requested direction.
    AtBoundary { step: WizardStep },
}

impl Navigation {
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

pub struct EstimateWizard {
    step: WizardStep,
    form: EstimateFormData,
    derived: DerivedEstimate,
    revisions: RevisionCounter,
    policy: Arc<dyn PricingPolicy>,
    service_area: ServiceArea,
}

impl EstimateWizard {
    pub fn new(policy: Arc<dyn PricingPolicy>) -> Self {
        Self::with_form(policy, EstimateFormData::default())
    }

    /// Starts at the first step with pre-filled data, e.g. a restored draft.
    pub fn with_form(policy: Arc<dyn PricingPolicy>, form: EstimateFormData) -> Self {
        let mut wizard = Self {
            step: WizardStep::MoveType,
            form,
            derived: DerivedEstimate::default(),
            revisions: RevisionCounter::default(),
            policy,
            service_area: ServiceArea::default(),
        };
        wizard.refresh();
        wizard
    }

    pub fn with_service_area(mut self, area: ServiceArea) -> Self {
        self.service_area = area;
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &EstimateFormData {
        &self.form
    }

    pub fn derived(&self) -> &DerivedEstimate {
        &self.derived
    }

    pub fn policy_kind(&self) -> PricingPolicyKind {
        self.policy.kind()
    }

    pub fn update_field(&mut self, update: FieldUpdate) {
        debug!(field = update.field(), step = %self.step, "wizard field updated");
        update.apply(&mut self.form);
        self.refresh();
    }

    /// Records an address edit. The text is stored as given; coordinates are
    /// set when `place` carries usable geometry and cleared otherwise.
    pub fn select_address(
        &mut self,
        target: AddressTarget,
        address: impl Into<String>,
        place: Option<&PlaceResult>,
    ) -> AddressRevision {
        let address = address.into();
        let coordinates = place.and_then(PlaceResult::coordinates);
        let revision = self.revisions.bump(target);

        let (text, slot) = match target {
            AddressTarget::From => (&mut self.form.from_address, &mut self.form.from_coordinates),
            AddressTarget::To => (&mut self.form.to_address, &mut self.form.to_coordinates),
        };
        *text = address;
        *slot = coordinates;

        debug!(
            target = target.label(),
            sequence = revision.sequence,
            resolved = coordinates.is_some(),
            "wizard address selected"
        );
        self.refresh();
        revision
    }

    /// Applies a lookup that completed asynchronously. Returns `false` and
    /// leaves the form untouched when the address was edited again since
    /// `revision` was issued.
    pub fn apply_resolved_address(&mut self, revision: AddressRevision, place: &PlaceResult) -> bool {
        if !self.revisions.is_current(revision) {
            debug!(
                target = revision.target.label(),
                sequence = revision.sequence,
                "discarding stale address lookup"
            );
            return false;
        }

        self.select_address(revision.target, place.full_address.clone(), Some(place));
        true
    }

    pub fn can_advance(&self) -> bool {
        can_advance(self.step, &self.form)
    }

    pub fn next(&mut self) -> Navigation {
        let Some(to) = self.step.next() else {
            return Navigation::AtBoundary { step: self.step };
        };
        if !self.can_advance() {
            debug!(step = %self.step, "wizard advance blocked");
            return Navigation::Blocked { step: self.step };
        }
        self.transition(to)
    }

    pub fn back(&mut self) -> Navigation {
        match self.step.previous() {
            Some(to) => self.transition(to),
            None => Navigation::AtBoundary { step: self.step },
        }
    }

    /// Every step before the summary has what it needs.
    pub fn is_complete(&self) -> bool {
        WizardStep::ordered()
            .into_iter()
            .filter(|step| !step.is_terminal())
            .all(|step| can_advance(step, &self.form))
    }

    /// Whether both endpoints fall inside the service area, once known.
    pub fn route_in_service_area(&self) -> Option<bool> {
        let (origin, destination) = self.form.route()?;
        Some(self.service_area.contains(&origin) && self.service_area.contains(&destination))
    }

    /// Payload for the submission collaborator, once the form is complete.
    pub fn submission(&self) -> Option<EstimateSubmission> {
        if !self.is_complete() {
            return None;
        }
        Some(EstimateSubmission::new(self.form.clone(), &self.derived))
    }

    fn transition(&mut self, to: WizardStep) -> Navigation {
        let from = self.step;
        self.step = to;
        debug!(%from, %to, "wizard step changed");
        Navigation::Moved { from, to }
    }

    fn refresh(&mut self) {
        if let Some(derived) = recompute(&self.form, self.policy.as_ref()) {
            debug!(
                distance = derived.distance,
                min = derived.min,
                max = derived.max,
                "wizard estimate recomputed"
            );
            self.derived = derived;
        }
    }
}
