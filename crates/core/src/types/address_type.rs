//! Address roles.
//!
//! Every address operation is tagged with one of these roles. The numeric
//! codes are the ones stored in the `contact_address.type_id` column.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when converting into an [`AddressType`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressTypeError {
    /// The numeric code is outside `1..=7`.
    #[error("unknown address type code: {0}")]
    UnknownCode(i32),
    /// The name does not match any role.
    #[error("unknown address type: {0}")]
    UnknownName(String),
}

/// Closed set of address roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressType {
    Billing,
    Delivery,
    Sender,
    Return,
    Client,
    Contractor,
    Warehouse,
}

impl AddressType {
    /// All roles in code order.
    pub const ALL: [Self; 7] = [
        Self::Billing,
        Self::Delivery,
        Self::Sender,
        Self::Return,
        Self::Client,
        Self::Contractor,
        Self::Warehouse,
    ];

    /// Numeric storage code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Billing => 1,
            Self::Delivery => 2,
            Self::Sender => 3,
            Self::Return => 4,
            Self::Client => 5,
            Self::Contractor => 6,
            Self::Warehouse => 7,
        }
    }

    /// Snake-case name, identical to the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Billing => "billing",
            Self::Delivery => "delivery",
            Self::Sender => "sender",
            Self::Return => "return",
            Self::Client => "client",
            Self::Contractor => "contractor",
            Self::Warehouse => "warehouse",
        }
    }

    /// Whether guests can hold a session-bound address of this role.
    ///
    /// Only billing and delivery addresses are remembered for guests.
    #[must_use]
    pub const fn is_guest_bindable(self) -> bool {
        matches!(self, Self::Billing | Self::Delivery)
    }
}

impl TryFrom<i32> for AddressType {
    type Error = AddressTypeError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or(AddressTypeError::UnknownCode(code))
    }
}

impl From<AddressType> for i32 {
    fn from(address_type: AddressType) -> Self {
        address_type.code()
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AddressType {
    type Err = AddressTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AddressTypeError::UnknownName(s.to_owned()))
    }
}

// SQLx support (with postgres feature): stored as the numeric code.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for AddressType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for AddressType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let code = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::try_from(code)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for AddressType {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.code(), buf)
    }
}
