//! Column-header normalization.
//!
//! Capture exports name their transform columns in whatever convention the
//! exporter grew up with ("POS_X", "rPosX", plain "x", ...). Every accepted
//! spelling maps onto one canonical semantic field, and a header may carry
//! an actor prefix ("robot1X_POS") scoping it to a single actor.
//!
//! Matching is suffix-based and case-insensitive: an actor-prefixed header
//! resolves by whether its upper-cased form ends with a known alias, and
//! whatever precedes the alias is kept as the actor prefix. Aliases are
//! tested in a fixed enumeration order and the first match wins. This is a
//! best-effort heuristic over arbitrary exports; do not "improve" it to
//! prefix or fuzzy matching.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One of the fixed semantic axes a column header can normalize to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    PosX,
    PosY,
    PosZ,
    RotX,
    RotY,
    RotZ,
    RotW,
    SclX,
    SclY,
    SclZ,
}

impl CanonicalField {
    /// Canonical spelling used as the descriptor-map key suffix.
    #[inline]
    pub fn key(&self) -> &'static str {
        match self {
            Self::PosX => "X_POS",
            Self::PosY => "Y_POS",
            Self::PosZ => "Z_POS",
            Self::RotX => "X_ROT",
            Self::RotY => "Y_ROT",
            Self::RotZ => "Z_ROT",
            Self::RotW => "W_ROT",
            Self::SclX => "X_SCL",
            Self::SclY => "Y_SCL",
            Self::SclZ => "Z_SCL",
        }
    }

    /// Position axes in x, y, z order.
    pub const POSITION: [CanonicalField; 3] = [Self::PosX, Self::PosY, Self::PosZ];
    /// Rotation components in x, y, z, w order.
    pub const ROTATION: [CanonicalField; 4] = [Self::RotX, Self::RotY, Self::RotZ, Self::RotW];
    /// Scale axes in x, y, z order.
    pub const SCALE: [CanonicalField; 3] = [Self::SclX, Self::SclY, Self::SclZ];
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A header that matched a canonical field, with its actor prefix (possibly
/// empty) preserved in its original casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHeader {
    pub actor: String,
    pub field: CanonicalField,
}

impl ResolvedHeader {
    /// Descriptor-map key: actor prefix + canonical spelling.
    #[inline]
    pub fn key(&self) -> String {
        format!("{}{}", self.actor, self.field.key())
    }
}

// Accepted alternative spellings, upper-case. Enumerated most-specific
// (longest) suffix first, stable within a length, so that a bare axis
// letter never shadows a longer documented spelling ("SCALE_X" must not
// resolve through the "X" alias). The first suffix match wins.
static ALIASES: Lazy<Vec<(&'static str, CanonicalField)>> = Lazy::new(|| {
    use CanonicalField::*;
    let groups: [(&[&'static str], CanonicalField); 10] = [
        (&["RPOSX", "POS_X", "X", "X_POS"], PosX),
        (&["RPOSY", "POS_Y", "Y", "Y_POS"], PosY),
        (&["RPOSZ", "POS_Z", "Z", "Z_POS"], PosZ),
        (&["RROTX", "ROT_X", "RX", "QX", "X_ROT"], RotX),
        (&["RROTY", "ROT_Y", "RY", "QY", "Y_ROT"], RotY),
        (&["RROTZ", "ROT_Z", "RZ", "QZ", "Z_ROT"], RotZ),
        (&["RROTW", "ROT_W", "RW", "QW", "W_ROT"], RotW),
        (&["RSCLX", "SCALE_X", "X_SCALE", "X_SCL"], SclX),
        (&["RSCLY", "SCALE_Y", "Y_SCALE", "Y_SCL"], SclY),
        (&["RSCLZ", "SCALE_Z", "Z_SCALE", "Z_SCL"], SclZ),
    ];
    let mut aliases = Vec::new();
    for (spellings, field) in groups {
        for spelling in spellings {
            aliases.push((*spelling, field));
        }
    }
    aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    aliases
});

/// Resolve a header to a canonical field, or `None` for a free-form
/// joint/actuator name.
pub fn resolve(header: &str) -> Option<ResolvedHeader> {
    let upper = header.to_ascii_uppercase();
    for (suffix, field) in ALIASES.iter() {
        if upper.ends_with(suffix) {
            let actor = header[..header.len() - suffix.len()].to_string();
            return Some(ResolvedHeader {
                actor,
                field: *field,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternative_spellings() {
        for spelling in ["RPOSX", "POS_X", "X", "X_POS", "rposx", "pos_x", "x"] {
            let resolved = resolve(spelling).unwrap();
            assert_eq!(resolved.field, CanonicalField::PosX, "{spelling}");
            assert_eq!(resolved.actor, "");
        }
        assert_eq!(resolve("QW").unwrap().field, CanonicalField::RotW);
        assert_eq!(resolve("scale_z").unwrap().field, CanonicalField::SclZ);
    }

    #[test]
    fn test_actor_prefix_preserved() {
        let resolved = resolve("robot1RPOSX").unwrap();
        assert_eq!(resolved.actor, "robot1");
        assert_eq!(resolved.field, CanonicalField::PosX);
        assert_eq!(resolved.key(), "robot1X_POS");
    }

    #[test]
    fn test_prefix_casing_survives() {
        let resolved = resolve("RoBot_aX_ROT").unwrap();
        assert_eq!(resolved.actor, "RoBot_a");
        assert_eq!(resolved.field, CanonicalField::RotX);
    }

    #[test]
    fn test_free_form_names_not_normalized() {
        assert!(resolve("shoulder_pan_joint").is_none());
        assert!(resolve("j1").is_none());
        assert!(resolve("time").is_none());
    }

    #[test]
    fn test_first_enumerated_match_wins() {
        // "QX" ends with both the two-letter rotation alias "QX" and the
        // bare position alias "X". Most-specific-first enumeration makes
        // the rotation alias the first match, not an actor "Q" position.
        let resolved = resolve("QX").unwrap();
        assert_eq!(resolved.field, CanonicalField::RotX);
        assert_eq!(resolved.actor, "");

        let resolved = resolve("SCALE_X").unwrap();
        assert_eq!(resolved.field, CanonicalField::SclX);
        assert_eq!(resolved.actor, "");

        // A longer suffix wins even when it drags an actor prefix along.
        let resolved = resolve("armPOS_X").unwrap();
        assert_eq!(resolved.field, CanonicalField::PosX);
        assert_eq!(resolved.actor, "arm");
    }
}
