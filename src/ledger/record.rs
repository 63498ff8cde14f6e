/// Declares a record of fixed, named text fields.
///
/// Each field is stored as the operator typed it and is addressable by its
/// camel-case wire name, which is also its JSON key. The generated impl gives
/// name-based access (`get`, `field_mut`, `set`), ordered iteration, `clear`,
/// and conversion into a [`FieldMap`](crate::ledger::FieldMap).
macro_rules! text_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $field:ident => $key:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            $(
                #[serde(rename = $key, default)]
                pub $field: String,
            )+
        }

        impl $name {
            /// Wire names of every field, in display order.
            pub const FIELDS: &'static [&'static str] = &[$($key),+];

            pub fn get(&self, key: &str) -> Option<&str> {
                match key {
                    $($key => Some(self.$field.as_str()),)+
                    _ => None,
                }
            }

            pub fn field_mut(&mut self, key: &str) -> Option<&mut String> {
                match key {
                    $($key => Some(&mut self.$field),)+
                    _ => None,
                }
            }

            /// Overwrites a known field; unknown names are left alone and reported as `false`.
            pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
                match self.field_mut(key) {
                    Some(slot) => {
                        *slot = value.into();
                        true
                    }
                    None => false,
                }
            }

            pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
                [$(($key, self.$field.as_str())),+].into_iter()
            }

            pub fn clear(&mut self) {
                *self = Self::default();
            }

            pub fn to_field_map(&self) -> $crate::ledger::FieldMap {
                self.entries()
                    .map(|(key, value)| (key, value.to_string()))
                    .collect()
            }
        }
    };
}
