//! `[Aida64]`

use super::Profile;
use crate::constants::{bounds, sections};
use crate::field::{FieldRegistry, Subscription};
use crate::sync::{Gate, NumberBinding, SyncContext, TestSetBinding, ToggleBinding};

pub mod fields {
    use crate::field::FieldId;

    pub const MODE_CACHE: FieldId = FieldId::new("aida64.mode.CACHE");
    pub const MODE_CPU: FieldId = FieldId::new("aida64.mode.CPU");
    pub const MODE_FPU: FieldId = FieldId::new("aida64.mode.FPU");
    pub const MODE_RAM: FieldId = FieldId::new("aida64.mode.RAM");
    pub const USE_AVX: FieldId = FieldId::new("aida64.useavx");
    pub const MAX_MEMORY: FieldId = FieldId::new("aida64.maxmemory");
}

const MODE: TestSetBinding = TestSetBinding {
    key: "mode",
    tests: &[
        ("CACHE", fields::MODE_CACHE),
        ("CPU", fields::MODE_CPU),
        ("FPU", fields::MODE_FPU),
        ("RAM", fields::MODE_RAM),
    ],
    default: "CACHE",
    gate: Gate::Always,
    empty_fallback: "CACHE",
};

const USE_AVX: ToggleBinding = ToggleBinding::lenient(fields::USE_AVX, "useavx");

const MAX_MEMORY: NumberBinding =
    NumberBinding::plain(fields::MAX_MEMORY, "maxmemory", 90, bounds::AIDA64_MAX_MEMORY);

pub struct Aida64;

impl Profile for Aida64 {
    const NAME: &'static str = sections::AIDA64;

    fn declare_fields(registry: &mut FieldRegistry) {
        for (_, id) in MODE.tests {
            registry.register(*id, false);
        }
        registry.register(fields::USE_AVX, false);
        registry.register(fields::MAX_MEMORY, 0_i64);
    }

    fn bind(ctx: &SyncContext, registry: &FieldRegistry) -> Vec<Subscription> {
        let section = ctx.section(sections::AIDA64);
        let mut subs = MODE.attach(&section, registry);
        subs.extend(USE_AVX.attach(&section, registry));
        subs.extend(MAX_MEMORY.attach(&section, registry));
        subs
    }
}
