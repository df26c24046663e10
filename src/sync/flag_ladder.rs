//! Radio group ↔ ordered boolean keys
//!
//! Level `n` sets the first `n` keys and clears the rest, so each level implies
//! every level below it.

use tracing::{debug, warn};

use super::Section;
use super::toggle::encode_bool;
use crate::config::parse_bool;
use crate::field::{FieldId, FieldRegistry, Subscription};

#[derive(Debug, Clone, Copy)]
pub struct FlagLadder {
    pub field: FieldId,
    /// Keys from the lowest level up
    pub keys: &'static [&'static str],
}

impl FlagLadder {
    /// Number of leading keys that read as true
    pub fn level(&self, section: &Section) -> usize {
        self.keys
            .iter()
            .take_while(|key| {
                section
                    .get_raw(key)
                    .and_then(|raw| parse_bool(&raw))
                    .unwrap_or(false)
            })
            .count()
    }

    pub fn attach(&self, section: &Section, registry: &FieldRegistry) -> Vec<Subscription> {
        let Some(field) = registry.lookup::<usize>(self.field).bound() else {
            return Vec::new();
        };
        field.seed(self.level(section));

        let ladder = *self;
        let section = section.clone();
        vec![field.subscribe(move |level: &usize| {
            if *level > ladder.keys.len() {
                warn!(field = %ladder.field, level, "Level out of range, not saved");
                return;
            }
            for (position, key) in ladder.keys.iter().enumerate() {
                if !section.write(key, encode_bool(position < *level)) {
                    break;
                }
            }
            debug!(field = %ladder.field, level, "Updated flag ladder");
        })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::Harness;

    const CPU: FieldId = FieldId::new("prime95custom.cpuSupport");
    const LADDER: FlagLadder = FlagLadder {
        field: CPU,
        keys: &["cpusupportsavx", "cpusupportsavx2", "cpusupportsfma3", "cpusupportsavx512"],
    };

    #[test]
    fn test_level_counts_leading_flags() {
        let h = Harness::new(
            "[Prime95Custom]\ncpusupportsavx = 1\ncpusupportsavx2 = 1\ncpusupportsfma3 = 0\ncpusupportsavx512 = 1\n",
        );
        assert_eq!(LADDER.level(&h.ctx.section("Prime95Custom")), 2);

        let h = Harness::new("");
        assert_eq!(LADDER.level(&h.ctx.section("Prime95Custom")), 0);
    }

    #[test]
    fn test_select_level_writes_every_key() {
        let h = Harness::new("");
        let mut registry = FieldRegistry::new();
        let field = registry.register(CPU, 0_usize);
        let _subs = LADDER.attach(&h.ctx.section("Prime95Custom"), &registry);

        field.set(3);
        let stored: Vec<_> = LADDER
            .keys
            .iter()
            .map(|key| h.stored("Prime95Custom", key).unwrap_or_default())
            .collect();
        assert_eq!(stored, vec!["1", "1", "1", "0"]);

        field.set(0);
        assert_eq!(h.stored("Prime95Custom", "cpusupportsavx").as_deref(), Some("0"));
    }
}
