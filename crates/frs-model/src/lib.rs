pub mod codebook;
pub mod entity;
pub mod error;
pub mod ids;
pub mod uprating;

pub use codebook::{Codebook, NO_DESCRIPTION, VariableMetadata};
pub use entity::{
    ADMIN_COLUMNS, AGE_COLUMNS, BENUNIT_COLUMN, EntityLevel, NEED_PERSON_COLUMN, PERSON_COLUMN,
    PERSON_NUMBER_COLUMNS, SERIAL_COLUMN, WEIGHT_COLUMN, classify_table,
};
pub use error::{ModelError, Result};
pub use ids::{benunit_id, household_id, person_id};
pub use uprating::{PopulationProjection, UpratingParameters, VariableGroup};
