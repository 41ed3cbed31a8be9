// ============================================================
// RECORD MODEL LAYER
// ============================================================
// Typed records with a statically declared field <-> external key table.
// Construction from third-party data is lenient: unknown keys and missing
// required keys are logged, never fatal.

use std::collections::HashMap;

use tracing::warn;

use super::documents::LinkDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Links,
}

/// Static metadata for one record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// External display key; `None` marks an internal-only field
    pub key: Option<&'static str>,
    /// May legitimately be absent from source data
    pub optional: bool,
    pub kind: FieldKind,
}

/// An untyped field value as it arrives from a source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Links(Vec<LinkDocument>),
}

impl FieldValue {
    pub fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Links => FieldValue::Links(Vec::new()),
        }
    }

    /// Flatten into a single output cell
    pub fn to_cell(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Links(links) => LinkDocument::render_list(links),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Vec<LinkDocument>> for FieldValue {
    fn from(value: Vec<LinkDocument>) -> Self {
        FieldValue::Links(value)
    }
}

/// Key -> value mapping scraped from a source
pub type RecordMap = HashMap<String, FieldValue>;

/// Rust type that can back a record field
pub trait FieldSlot: Sized {
    const KIND: FieldKind;

    fn from_value(value: FieldValue) -> Self;
    fn to_value(&self) -> FieldValue;
}

impl FieldSlot for String {
    const KIND: FieldKind = FieldKind::Text;

    fn from_value(value: FieldValue) -> Self {
        value.to_cell()
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

impl FieldSlot for Vec<LinkDocument> {
    const KIND: FieldKind = FieldKind::Links;

    fn from_value(value: FieldValue) -> Self {
        match value {
            FieldValue::Links(links) => links,
            FieldValue::Text(text) => {
                if !text.is_empty() {
                    warn!(value = %text, "Plain text supplied for a link list field; dropped");
                }
                Vec::new()
            }
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Links(self.clone())
    }
}

/// A named tuple of fields with a fixed declaration order.
///
/// Field order defines the empty-instance shape and the output column order.
pub trait Record: Sized {
    const NAME: &'static str;
    const FIELDS: &'static [FieldSpec];

    /// Build from values in declaration order
    fn from_values(values: Vec<FieldValue>) -> Self;

    /// Values in declaration order
    fn values(&self) -> Vec<FieldValue>;

    /// Every field at its zero value; stands in for "no match found"
    fn empty_instance() -> Self {
        Self::from_values(
            Self::FIELDS
                .iter()
                .map(|spec| FieldValue::empty(spec.kind))
                .collect(),
        )
    }

    /// Build from an external-key mapping
    fn from_mapping(data: RecordMap) -> Self {
        let mut unknown: Vec<&str> = data
            .keys()
            .map(String::as_str)
            .filter(|key| !Self::FIELDS.iter().any(|spec| spec.key == Some(*key)))
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            warn!(record = Self::NAME, keys = %unknown.join(", "), "Unknown keys ignored");
        }

        let mut missing = Vec::new();
        let values = Self::FIELDS
            .iter()
            .map(|spec| match spec.key.and_then(|key| data.get(key)) {
                Some(value) => value.clone(),
                None => {
                    if let (Some(key), false) = (spec.key, spec.optional) {
                        missing.push(key);
                    }
                    FieldValue::empty(spec.kind)
                }
            })
            .collect();
        if !missing.is_empty() {
            warn!(record = Self::NAME, keys = %missing.join(", "), "Required keys missing");
        }

        Self::from_values(values)
    }

    /// Build from a fixed-order row of cells
    fn from_cells(cells: Vec<String>) -> Self {
        if cells.len() != Self::FIELDS.len() {
            warn!(
                record = Self::NAME,
                expected = Self::FIELDS.len(),
                actual = cells.len(),
                "Row width does not match record shape"
            );
        }
        let mut cells = cells.into_iter();
        let values = Self::FIELDS
            .iter()
            .map(|spec| match (spec.kind, cells.next()) {
                (FieldKind::Text, Some(cell)) => FieldValue::Text(cell),
                _ => FieldValue::empty(spec.kind),
            })
            .collect();
        Self::from_values(values)
    }

    /// External keys in declaration order, internal-only fields omitted
    fn header() -> Vec<&'static str> {
        Self::FIELDS.iter().filter_map(|spec| spec.key).collect()
    }

    fn to_row(&self) -> Vec<String> {
        self.values().iter().map(FieldValue::to_cell).collect()
    }

    fn to_external_mapping(&self) -> RecordMap {
        Self::FIELDS
            .iter()
            .zip(self.values())
            .filter_map(|(spec, value)| spec.key.map(|key| (key.to_string(), value)))
            .collect()
    }
}

/// Declare a record struct together with its field table.
///
/// ```ignore
/// define_record! {
///     pub struct Example {
///         name: String => "名称",
///         note: String => "備考" [optional],
///         links: Vec<LinkDocument> => "閲覧書類",
///     }
/// }
/// ```
macro_rules! define_record {
    (@key) => { None };
    (@key $key:literal) => { Some($key) };
    (@optional) => { false };
    (@optional optional) => { true };
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty $(=> $key:literal)? $([$flag:ident])?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
        }

        impl $crate::domain::record::Record for $name {
            const NAME: &'static str = stringify!($name);
            const FIELDS: &'static [$crate::domain::record::FieldSpec] = &[
                $(
                    $crate::domain::record::FieldSpec {
                        name: stringify!($field),
                        key: define_record!(@key $($key)?),
                        optional: define_record!(@optional $($flag)?),
                        kind: <$ty as $crate::domain::record::FieldSlot>::KIND,
                    },
                )*
            ];

            fn from_values(values: Vec<$crate::domain::record::FieldValue>) -> Self {
                let mut values = values.into_iter();
                Self {
                    $(
                        $field: values
                            .next()
                            .map(<$ty as $crate::domain::record::FieldSlot>::from_value)
                            .unwrap_or_default(),
                    )*
                }
            }

            fn values(&self) -> Vec<$crate::domain::record::FieldValue> {
                vec![
                    $( <$ty as $crate::domain::record::FieldSlot>::to_value(&self.$field), )*
                ]
            }
        }
    };
}

pub(crate) use define_record;
