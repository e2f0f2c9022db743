//! Name generation and species derivation.
//!
//! A name is `"<species prefix> <epithet>"`. The species is the leading
//! token, so renderers and templates can rely on the canonical prefixes
//! and [`species_of`] is a pure function of the name. Both are fixed at
//! birth and never change.

use garden_types::enums::EntityKind;
use garden_types::random::{self, RandomSource};

const PLANT_PREFIXES: &[&str] = &["Fern", "Moss", "Ivy", "Thistle", "Clover", "Nettle"];
const PLANT_EPITHETS: &[&str] = &[
    "Duskveil",
    "Sunspray",
    "Dewlace",
    "Thornwhisper",
    "Gladefold",
    "Brightcoil",
];

const HERBIVORE_PREFIXES: &[&str] = &["Vole", "Hare", "Beetle", "Snail", "Finch", "Doe"];
const HERBIVORE_EPITHETS: &[&str] = &[
    "Swiftfoot",
    "Mossback",
    "Leafnibbler",
    "Dapplehide",
    "Quickwhisker",
    "Fernhopper",
];

const CARNIVORE_PREFIXES: &[&str] = &["Fox", "Hawk", "Stoat", "Adder", "Lynx", "Shrike"];
const CARNIVORE_EPITHETS: &[&str] = &[
    "Redfang",
    "Nightclaw",
    "Sharpeye",
    "Shadowpelt",
    "Keenbeak",
    "Swiftstrike",
];

const FUNGUS_PREFIXES: &[&str] = &["Morel", "Puffball", "Inkcap", "Bracket", "Russula", "Webcap"];
const FUNGUS_EPITHETS: &[&str] = &[
    "Dampglow",
    "Sporeveil",
    "Rotlace",
    "Mistbloom",
    "Shadegill",
    "Duskspore",
];

/// The canonical species prefixes for a kind.
pub const fn prefixes_for(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Plant => PLANT_PREFIXES,
        EntityKind::Herbivore => HERBIVORE_PREFIXES,
        EntityKind::Carnivore => CARNIVORE_PREFIXES,
        EntityKind::Fungus => FUNGUS_PREFIXES,
    }
}

const fn epithets_for(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Plant => PLANT_EPITHETS,
        EntityKind::Herbivore => HERBIVORE_EPITHETS,
        EntityKind::Carnivore => CARNIVORE_EPITHETS,
        EntityKind::Fungus => FUNGUS_EPITHETS,
    }
}

/// Generate a fresh name for a kind. Consumes two draws.
pub fn generate_name(kind: EntityKind, rng: &mut dyn RandomSource) -> String {
    let prefix = random::pick(rng, prefixes_for(kind)).copied().unwrap_or("Sprout");
    let epithet = random::pick(rng, epithets_for(kind)).copied().unwrap_or("Nameless");
    format!("{prefix} {epithet}")
}

/// Derive the species from a name: its leading whitespace-separated token.
pub fn species_of(name: &str) -> String {
    name.split_whitespace()
        .next()
        .unwrap_or(name)
        .to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use garden_types::random::SeededSource;

    use super::*;

    #[test]
    fn names_have_a_known_prefix() {
        let mut rng = SeededSource::from_seed(21);
        for kind in EntityKind::ALL {
            for _ in 0..50 {
                let name = generate_name(kind, &mut rng);
                let species = species_of(&name);
                assert!(
                    prefixes_for(kind).contains(&species.as_str()),
                    "species {species} not canonical for {kind}"
                );
            }
        }
    }

    #[test]
    fn species_is_the_leading_token() {
        assert_eq!(species_of("Fern Duskveil"), "Fern");
        assert_eq!(species_of("Fox Nightclaw"), "Fox");
        assert_eq!(species_of("Lone"), "Lone");
    }

    #[test]
    fn species_is_stable_under_rederivation() {
        let mut rng = SeededSource::from_seed(5);
        let name = generate_name(EntityKind::Fungus, &mut rng);
        assert_eq!(species_of(&name), species_of(&name.clone()));
    }
}
