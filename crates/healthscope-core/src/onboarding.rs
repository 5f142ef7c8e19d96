//! First-run onboarding
//!
//! Four steps: welcome, name, personal info (age and email, both optional)
//! and a feature overview. Only the name and personal info steps validate
//! input; `next` refuses to advance past an invalid step.

use std::fmt;

use tracing::info;

use crate::error::{Result, ValidationError};
use crate::models::UserProfile;
use crate::store::PersistenceStore;

/// Ages accepted by the personal info step
pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 119;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum OnboardingStep {
    #[default]
    Welcome,
    Name,
    PersonalInfo,
    Features,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 4] = [
        Self::Welcome,
        Self::Name,
        Self::PersonalInfo,
        Self::Features,
    ];

    /// Zero-based position of the step
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn is_last(&self) -> bool {
        matches!(self, Self::Features)
    }

    fn next(self) -> Self {
        Self::ALL.get(self.index() + 1).copied().unwrap_or(self)
    }

    fn previous(self) -> Self {
        self.index()
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(self)
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Welcome => "welcome",
            Self::Name => "name",
            Self::PersonalInfo => "personal info",
            Self::Features => "features",
        };
        write!(f, "{}", name)
    }
}

/// Raw user input collected across the steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingDraft {
    pub name: String,
    /// Free text; blank means "not provided"
    pub age: String,
    /// Free text; blank means "not provided"
    pub email: String,
}

/// Check that the name is not blank
pub fn validate_name(name: &str) -> std::result::Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

/// Parse an optional age; blank is `None`, otherwise an integer in 1..=119
pub fn parse_age(age: &str) -> std::result::Result<Option<u8>, ValidationError> {
    let trimmed = age.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<u8>() {
        Ok(age) if (MIN_AGE..=MAX_AGE).contains(&age) => Ok(Some(age)),
        _ => Err(ValidationError::InvalidAge),
    }
}

/// Validate the input belonging to `step`
pub fn validate_step(
    step: OnboardingStep,
    draft: &OnboardingDraft,
) -> std::result::Result<(), ValidationError> {
    match step {
        OnboardingStep::Name => validate_name(&draft.name),
        OnboardingStep::PersonalInfo => parse_age(&draft.age).map(|_| ()),
        OnboardingStep::Welcome | OnboardingStep::Features => Ok(()),
    }
}

/// Onboarding flow state
#[derive(Debug, Clone, Default)]
pub struct Onboarding {
    step: OnboardingStep,
    pub draft: OnboardingDraft,
}

impl Onboarding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    /// Advance one step if the current one validates
    ///
    /// Stays on the last step once reached.
    pub fn next(&mut self) -> std::result::Result<OnboardingStep, ValidationError> {
        validate_step(self.step, &self.draft)?;
        self.step = self.step.next();
        Ok(self.step)
    }

    /// Go back one step; never fails
    pub fn previous(&mut self) -> OnboardingStep {
        self.step = self.step.previous();
        self.step
    }

    /// Validate every step and save the resulting profile
    pub fn complete(&self, store: &PersistenceStore) -> Result<UserProfile> {
        complete(&self.draft, store)
    }
}

/// Build the profile from `draft` and save it as onboarded
///
/// Notifications start enabled. A blank email is stored as absent.
pub fn complete(draft: &OnboardingDraft, store: &PersistenceStore) -> Result<UserProfile> {
    validate_name(&draft.name)?;
    let age = parse_age(&draft.age)?;

    let email = draft.email.trim();
    let mut profile = UserProfile::new(draft.name.trim());
    profile.age = age;
    profile.email = (!email.is_empty()).then(|| email.to_string());
    profile.onboarding_completed = true;
    profile.notifications_enabled = true;

    store.save_profile(&profile)?;
    info!(profile_id = %profile.id, "Onboarding completed");

    Ok(profile)
}
