//! Data type equivalence between schema documents and DDL.

/// Families of interchangeable type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Number,
    Integer,
    String,
    Temporal,
}

impl TypeFamily {
    pub fn members(&self) -> &'static [&'static str] {
        match self {
            Self::Number => &["DECIMAL", "FLOAT", "NUMBER", "DOUBLE", "NUMERIC"],
            Self::Integer => &["INT", "INTEGER", "BIGINT", "SMALLINT"],
            Self::String => &["VARCHAR", "TEXT", "STRING", "CHAR"],
            Self::Temporal => &["DATE", "DATETIME", "TIMESTAMP"],
        }
    }

    /// Family of a type name, if it belongs to one.
    ///
    /// Multi-word names (`DOUBLE PRECISION`) are classified by their first
    /// word when the whole name is not listed.
    pub fn of(type_name: &str) -> Option<Self> {
        let normalized = normalize(type_name);
        let first_word = normalized.split_whitespace().next().unwrap_or_default();
        [Self::Number, Self::Integer, Self::String, Self::Temporal]
            .into_iter()
            .find(|family| {
                let members = family.members();
                members.contains(&normalized.as_str()) || members.contains(&first_word)
            })
    }
}

/// Trim, upper-case and drop a parenthesised size suffix.
///
/// `varchar(255)` becomes `VARCHAR`, `DECIMAL (10, 2)` becomes `DECIMAL`.
pub fn normalize(type_name: &str) -> String {
    let base = match type_name.find('(') {
        Some(open) => &type_name[..open],
        None => type_name,
    };
    base.trim().to_ascii_uppercase()
}

/// Whether two type names are interchangeable.
///
/// Names in the same family are; anything else must match exactly after
/// normalization. The relation is symmetric.
pub fn equivalent(a: &str, b: &str) -> bool {
    match (TypeFamily::of(a), TypeFamily::of(b)) {
        (Some(left), Some(right)) => left == right,
        _ => normalize(a) == normalize(b),
    }
}

/// Whether the type belongs to the NUMBER family.
pub fn is_number(type_name: &str) -> bool {
    TypeFamily::of(type_name) == Some(TypeFamily::Number)
}
