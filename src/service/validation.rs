//! Field rules for inbound customer payloads.

use crate::error::AppError;
use crate::model::{AREA_MAX_LEN, NAME_MAX_LEN, PHONE_MAX_LEN};
use crate::schema::{CustomerCreate, CustomerUpdate};

/// Shape-level checks run at the boundary, before any store access.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub field: &'static str,
    pub min_length: usize,
    pub max_length: usize,
}

pub const NAME: FieldRule = FieldRule {
    field: "name",
    min_length: 1,
    max_length: NAME_MAX_LEN,
};

pub const PHONE: FieldRule = FieldRule {
    field: "phone",
    min_length: 1,
    max_length: PHONE_MAX_LEN,
};

pub const AREA: FieldRule = FieldRule {
    field: "area",
    min_length: 1,
    max_length: AREA_MAX_LEN,
};

impl FieldRule {
    /// Lengths count characters, matching VARCHAR(n). Whitespace alone does not meet the minimum.
    pub fn check(&self, value: &str) -> Result<(), AppError> {
        if value.trim().chars().count() < self.min_length {
            return Err(AppError::Validation(format!(
                "{} must be at least {} characters",
                self.field, self.min_length
            )));
        }
        if value.chars().count() > self.max_length {
            return Err(AppError::Validation(format!(
                "{} must be at most {} characters",
                self.field, self.max_length
            )));
        }
        Ok(())
    }

    fn check_patch(&self, value: &Option<Option<String>>) -> Result<(), AppError> {
        match value {
            None => Ok(()),
            Some(None) => Err(AppError::Validation(format!("{} cannot be null", self.field))),
            Some(Some(v)) => self.check(v),
        }
    }
}

impl Validate for CustomerCreate {
    fn validate(&self) -> Result<(), AppError> {
        NAME.check(&self.name)?;
        PHONE.check(&self.phone)?;
        AREA.check(&self.area)
    }
}

impl Validate for CustomerUpdate {
    /// Only fields present in the body are checked.
    fn validate(&self) -> Result<(), AppError> {
        NAME.check_patch(&self.name)?;
        PHONE.check_patch(&self.phone)?;
        AREA.check_patch(&self.area)
    }
}
