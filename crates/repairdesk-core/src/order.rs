//! Orders and parts: the records a repair shop tracks.
//!
//! An [`Order`] is one repair job. It owns an ordered list of [`Part`]s and a
//! labor price; its total is always derived from those, never stored.
//!
//! The serialized shape uses camelCase field names and writes an absent phone
//! or region as an empty string, which is what existing stored collections
//! contain.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};
use crate::types::{OrderId, PartId};

/// Repair status. A plain label: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Received,
    InProgress,
    Done,
    Returned,
}

impl Status {
    /// All statuses in workflow order.
    pub const ALL: [Status; 4] = [
        Status::Received,
        Status::InProgress,
        Status::Done,
        Status::Returned,
    ];

    /// The stable key used in storage and on the command line.
    pub const fn key(self) -> &'static str {
        match self {
            Status::Received => "received",
            Status::InProgress => "in_progress",
            Status::Done => "done",
            Status::Returned => "returned",
        }
    }

    /// Human-readable label shown to shop staff.
    pub const fn label(self) -> &'static str {
        match self {
            Status::Received => "Принят",
            Status::InProgress => "В работе",
            Status::Done => "Готов",
            Status::Returned => "Выдан",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Status::ALL
            .into_iter()
            .find(|status| status.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::InvalidStatus(s.to_string()))
    }
}

/// Client region, from a fixed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Moscow,
    MoscowOblast,
    SaintPetersburg,
    Krasnodar,
    Rostov,
    Sverdlovsk,
    Novosibirsk,
    Tatarstan,
    Other,
}

impl Region {
    /// All regions in display order.
    pub const ALL: [Region; 9] = [
        Region::Moscow,
        Region::MoscowOblast,
        Region::SaintPetersburg,
        Region::Krasnodar,
        Region::Rostov,
        Region::Sverdlovsk,
        Region::Novosibirsk,
        Region::Tatarstan,
        Region::Other,
    ];

    /// Display name, also the stored form.
    pub const fn name(self) -> &'static str {
        match self {
            Region::Moscow => "Москва",
            Region::MoscowOblast => "Московская область",
            Region::SaintPetersburg => "Санкт-Петербург",
            Region::Krasnodar => "Краснодарский край",
            Region::Rostov => "Ростовская область",
            Region::Sverdlovsk => "Свердловская область",
            Region::Novosibirsk => "Новосибирская область",
            Region::Tatarstan => "Татарстан",
            Region::Other => "Другой",
        }
    }
}

impl AsRef<str> for Region {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Region::ALL
            .into_iter()
            .find(|region| region.name().to_lowercase() == wanted)
            .ok_or_else(|| CoreError::InvalidRegion(s.to_string()))
    }
}

impl Serialize for Region {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A billable component used in a repair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub name: String,
    /// Unit price.
    pub price: f64,
    pub quantity: u32,
}

impl Part {
    /// Create a part with a fresh identifier.
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            id: PartId::generate(),
            name: name.into(),
            price,
            quantity,
        }
    }

    /// `price * quantity`.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Parses `NAME:PRICE` or `NAME:PRICE:QUANTITY`. The name may itself
/// contain colons; numeric fields are taken from the right.
impl FromStr for Part {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.rsplitn(3, ':').collect();

        if let [qty, price, name] = fields.as_slice() {
            if let (Ok(price), Ok(qty)) = (price.trim().parse::<f64>(), qty.trim().parse::<u32>()) {
                return Ok(Part::new(name.trim(), price, qty));
            }
        }

        let (name, price) = s
            .rsplit_once(':')
            .ok_or_else(|| CoreError::InvalidPart(format!("{s:?}: expected NAME:PRICE[:QTY]")))?;
        let price = price
            .trim()
            .parse::<f64>()
            .map_err(|e| CoreError::InvalidPart(format!("{s:?}: bad price: {e}")))?;
        Ok(Part::new(name.trim(), price, 1))
    }
}

/// Which field of a part to change in [`OrderDraft::update_part`].
#[derive(Debug, Clone, PartialEq)]
pub enum PartField {
    Name(String),
    Price(f64),
    Quantity(u32),
}

/// A repair job record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub tool_name: String,
    pub client_name: String,
    #[serde(default, with = "blank_as_none")]
    pub client_phone: Option<String>,
    #[serde(default, with = "blank_as_none")]
    pub region: Option<Region>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(rename = "repairPrice")]
    pub labor_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a new order from a draft. `created_at == updated_at == now`.
    pub fn from_draft(id: OrderId, draft: OrderDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tool_name: draft.tool_name,
            client_name: draft.client_name,
            client_phone: draft.client_phone,
            region: draft.region,
            status: draft.status,
            comment: draft.comment,
            parts: draft.parts,
            labor_price: draft.labor_price,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy the editable fields into a draft.
    pub fn to_draft(&self) -> OrderDraft {
        OrderDraft {
            tool_name: self.tool_name.clone(),
            client_name: self.client_name.clone(),
            client_phone: self.client_phone.clone(),
            region: self.region,
            status: self.status,
            comment: self.comment.clone(),
            parts: self.parts.clone(),
            labor_price: self.labor_price,
        }
    }

    /// Sum of `price * quantity` over all parts.
    pub fn parts_total(&self) -> f64 {
        parts_total(&self.parts)
    }

    /// Labor price plus parts total.
    pub fn total(&self) -> f64 {
        self.labor_price + self.parts_total()
    }

    /// Whether any searchable field contains `needle`.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.tool_name.to_lowercase().contains(needle)
            || self.client_name.to_lowercase().contains(needle)
            || self
                .client_phone
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .contains(needle)
            || self
                .region
                .map(|r| r.name().to_lowercase())
                .unwrap_or_default()
                .contains(needle)
    }
}

/// The user-editable fields of an order, before it has an id or timestamps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderDraft {
    pub tool_name: String,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub region: Option<Region>,
    pub status: Status,
    pub comment: String,
    pub parts: Vec<Part>,
    pub labor_price: f64,
}

impl OrderDraft {
    /// Start a draft with the two required fields.
    pub fn new(tool_name: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            client_name: client_name.into(),
            ..Self::default()
        }
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.client_phone = Some(phone.into());
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn labor_price(mut self, price: f64) -> Self {
        self.labor_price = price;
        self
    }

    /// Append a part with the given values.
    pub fn part(mut self, name: impl Into<String>, price: f64, quantity: u32) -> Self {
        let id = self.fresh_part_id();
        self.parts.push(Part {
            id,
            name: name.into(),
            price,
            quantity,
        });
        self
    }

    /// Append an empty part (no name, price 0, quantity 1) and return its id.
    pub fn add_part(&mut self) -> PartId {
        let id = self.fresh_part_id();
        self.parts.push(Part {
            id: id.clone(),
            name: String::new(),
            price: 0.0,
            quantity: 1,
        });
        id
    }

    /// Change one field of the part with the given id.
    pub fn update_part(&mut self, id: &PartId, field: PartField) -> Result<(), ValidationError> {
        let part = self
            .parts
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| ValidationError::UnknownPart(id.clone()))?;

        match field {
            PartField::Name(name) => part.name = name,
            PartField::Price(price) => part.price = price,
            PartField::Quantity(quantity) => part.quantity = quantity,
        }
        Ok(())
    }

    /// Remove the part with the given id. Returns whether it was present.
    pub fn remove_part(&mut self, id: &PartId) -> bool {
        let before = self.parts.len();
        self.parts.retain(|p| &p.id != id);
        self.parts.len() != before
    }

    pub fn parts_total(&self) -> f64 {
        parts_total(&self.parts)
    }

    pub fn total(&self) -> f64 {
        self.labor_price + self.parts_total()
    }

    fn fresh_part_id(&self) -> PartId {
        loop {
            let id = PartId::generate();
            if !self.parts.iter().any(|p| p.id == id) {
                return id;
            }
        }
    }
}

fn parts_total(parts: &[Part]) -> f64 {
    parts.iter().map(Part::line_total).sum()
}

/// Serde adapter: `None` is written as `""`, and a blank string reads back
/// as `None`.
mod blank_as_none {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<str>,
    {
        serializer.serialize_str(value.as_ref().map(AsRef::as_ref).unwrap_or(""))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => {
                raw.parse().map(Some).map_err(serde::de::Error::custom)
            }
            _ => Ok(None),
        }
    }
}
