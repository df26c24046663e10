//! `[Linpack]`

use super::Profile;
use crate::constants::sections;
use crate::field::{FieldRegistry, Subscription};
use crate::sync::{ChoiceBinding, ChoiceMap, SyncContext};

pub mod fields {
    use crate::field::FieldId;

    pub const VERSION: FieldId = FieldId::new("linpack.version");
    pub const MODE: FieldId = FieldId::new("linpack.mode");
    pub const MEMORY: FieldId = FieldId::new("linpack.memory");
}

const CHOICES: [ChoiceBinding; 3] = [
    ChoiceBinding {
        field: fields::VERSION,
        key: "version",
        choices: ChoiceMap::new(&["2018", "2019", "2021", "2024"]),
        default: "2018",
    },
    ChoiceBinding {
        field: fields::MODE,
        key: "mode",
        choices: ChoiceMap::new(&["Medium", "Slowest", "Slow", "Fast", "Fastest"]),
        default: "Medium",
    },
    ChoiceBinding {
        field: fields::MEMORY,
        key: "memory",
        choices: ChoiceMap::new(&[
            "2GB", "100MB", "250MB", "500MB", "750MB", "1GB", "4GB", "6GB", "30GB",
        ]),
        default: "2GB",
    },
];

pub struct Linpack;

impl Profile for Linpack {
    const NAME: &'static str = sections::LINPACK;

    fn declare_fields(registry: &mut FieldRegistry) {
        for choice in CHOICES {
            registry.register(choice.field, 0_usize);
        }
    }

    fn bind(ctx: &SyncContext, registry: &FieldRegistry) -> Vec<Subscription> {
        let section = ctx.section(sections::LINPACK);
        CHOICES
            .iter()
            .flat_map(|choice| choice.attach(&section, registry))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::testing::{bind, field};

    #[test]
    fn test_version_reads_version_key() {
        // A memory value that would also be a valid version must not leak into it
        let (_h, registry, _subs) = bind::<Linpack>("[Linpack]\nversion = 2024\nmemory = 1GB\n");
        assert_eq!(field::<usize>(&registry, fields::VERSION).get(), 3);
        assert_eq!(field::<usize>(&registry, fields::MEMORY).get(), 5);

        let (_h, registry, _subs) = bind::<Linpack>("[Linpack]\nmemory = 2019\n");
        assert_eq!(field::<usize>(&registry, fields::VERSION).get(), 0);
    }

    #[test]
    fn test_selection_writes_canonical_strings() {
        let (h, registry, _subs) = bind::<Linpack>("");
        field::<usize>(&registry, fields::VERSION).set(2);
        field::<usize>(&registry, fields::MEMORY).set(8);

        assert_eq!(h.stored("Linpack", "version").as_deref(), Some("2021"));
        assert_eq!(h.stored("Linpack", "memory").as_deref(), Some("30GB"));
        assert_eq!(h.stored("Linpack", "mode"), None);
    }

    #[test]
    fn test_unknown_mode_falls_back_without_write() {
        let (h, registry, _subs) = bind::<Linpack>("[Linpack]\nmode = Quantum\n");
        assert_eq!(field::<usize>(&registry, fields::MODE).get(), 0);
        assert_eq!(h.stored("Linpack", "mode").as_deref(), Some("Quantum"));
    }
}
