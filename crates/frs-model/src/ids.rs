//! Synthetic entity identifiers.
//!
//! IDs compose positionally: the serial number occupies the hundreds and
//! above, the benefit unit number the tens digit and the person number the
//! units digit. The encoding is injective only while benefit unit and person
//! numbers stay within 0..=9; FRS releases never exceed that and the range is
//! not checked here. Each function returns `None` when the identifier does
//! not fit in an `i64`.

/// `serial × 100`.
pub fn household_id(serial: i64) -> Option<i64> {
    serial.checked_mul(100)
}

/// `serial × 100 + benunit × 10`.
pub fn benunit_id(serial: i64, benunit: i64) -> Option<i64> {
    household_id(serial)?.checked_add(benunit.checked_mul(10)?)
}

/// `serial × 100 + benunit × 10 + person`.
pub fn person_id(serial: i64, benunit: i64, person: i64) -> Option<i64> {
    benunit_id(serial, benunit)?.checked_add(person)
}
