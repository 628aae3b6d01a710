/// A closed enum that can key a rule table.
///
/// Every variant has a stable document name (`APPLIED`, `CV_SENT`, ...) and an
/// ordinal used to index fixed-size weight tables.
pub trait RuleKey: Copy + Eq + std::fmt::Debug + 'static {
    /// All variants, in ordinal order.
    const ALL: &'static [Self];

    /// Ordinal of this variant inside `ALL`.
    fn index(self) -> usize;

    /// Name used in rule documents and snapshots.
    fn as_str(self) -> &'static str;

    /// Look up a variant by its document name (case-insensitive).
    fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|variant| variant.as_str().eq_ignore_ascii_case(key))
    }
}

/// Declare a closed enum together with its `RuleKey` implementation.
///
/// Variant names serialize as SCREAMING_SNAKE_CASE, matching the document keys.
macro_rules! rule_key {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $key:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $key)] $variant),+
        }

        impl $crate::entity::RuleKey for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn index(self) -> usize {
                self as usize
            }

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::entity::RuleKey::as_str(*self))
            }
        }
    };
}

pub(crate) use rule_key;
