//! Commune names as written in mayoral orders.

/// A commune name: up to five capitalised words joined by spaces, hyphens
/// or lowercase particles (`Saint-Rémy-de-Provence`, `La Ciotat`,
/// `Aix-en-Provence`, `MARSEILLE`).
///
/// Case-sensitive regardless of the enclosing flags, and never crosses a
/// line break or a comma.
pub const COMMUNE: &str = r"(?-i:[\p{Lu}][\p{L}'’-]*(?:[ \t]+(?:(?:de|du|des|la|le|les|en|sur|sous|lès|lez|d['’]|l['’])[ \t]*)*[\p{Lu}][\p{L}'’-]*){0,4})";
