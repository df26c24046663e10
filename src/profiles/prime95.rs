//! `[Prime95]` and `[Prime95Custom]`

use super::Profile;
use crate::constants::{sections, tokens};
use crate::field::{FieldRegistry, Subscription};
use crate::sync::{
    ChoiceMap, FlagLadder, IntegerTextBinding, OverrideGroup, OverrideShape, SyncContext,
};

pub mod fields {
    use crate::field::FieldId;

    pub const MODE: FieldId = FieldId::new("prime95.mode");
    pub const MODE_OVERRIDE: FieldId = FieldId::new("prime95.modeOverride");
    pub const MODE_CUSTOM: FieldId = FieldId::new("prime95.modeCustom");
    pub const FFT_SIZE: FieldId = FieldId::new("prime95.fftSize");
    pub const FFT_SIZE_CUSTOM: FieldId = FieldId::new("prime95.fftSizeCustom");

    pub const MIN_TORTURE_FFT: FieldId = FieldId::new("prime95custom.mintorturefft");
    pub const MAX_TORTURE_FFT: FieldId = FieldId::new("prime95custom.maxtorturefft");
    pub const TORTURE_MEM: FieldId = FieldId::new("prime95custom.torturemem");
    pub const TORTURE_TIME: FieldId = FieldId::new("prime95custom.torturetime");
    /// SSE, AVX, AVX2, FMA3, AVX512
    pub const CPU_SUPPORT: FieldId = FieldId::new("prime95custom.cpuSupport");
}

const MODE: OverrideGroup = OverrideGroup {
    choice: fields::MODE,
    text: fields::MODE_CUSTOM,
    key: "mode",
    choices: ChoiceMap::new(&["SSE", "AVX", "AVX2", "AVX512"]),
    default: "SSE",
    shape: OverrideShape::Checkbox(fields::MODE_OVERRIDE),
    fallback: tokens::CUSTOM_LOWER,
};

const FFT_SIZE: OverrideGroup = OverrideGroup {
    choice: fields::FFT_SIZE,
    text: fields::FFT_SIZE_CUSTOM,
    key: "fftSize",
    choices: ChoiceMap::new(&[
        "Huge", "Smallest", "Small", "Large", "Moderate", "Heavy", "HeavyShort", "All",
        tokens::CUSTOM,
    ]),
    default: "Small",
    shape: OverrideShape::InBand { custom_index: 8 },
    fallback: tokens::CUSTOM,
};

const TORTURE: [IntegerTextBinding; 4] = [
    IntegerTextBinding::new(fields::MIN_TORTURE_FFT, "mintorturefft", "4"),
    IntegerTextBinding::new(fields::MAX_TORTURE_FFT, "maxtorturefft", "8192"),
    IntegerTextBinding::new(fields::TORTURE_MEM, "torturemem", "0"),
    IntegerTextBinding::new(fields::TORTURE_TIME, "torturetime", "1"),
];

const CPU_SUPPORT: FlagLadder = FlagLadder {
    field: fields::CPU_SUPPORT,
    keys: &["cpusupportsavx", "cpusupportsavx2", "cpusupportsfma3", "cpusupportsavx512"],
};

pub struct Prime95;

impl Profile for Prime95 {
    const NAME: &'static str = sections::PRIME95;

    fn declare_fields(registry: &mut FieldRegistry) {
        registry.register(fields::MODE, 0_usize);
        registry.register(fields::MODE_OVERRIDE, false);
        registry.register(fields::MODE_CUSTOM, String::new());
        registry.register(fields::FFT_SIZE, 0_usize);
        registry.register(fields::FFT_SIZE_CUSTOM, String::new());
        for torture in TORTURE {
            registry.register(torture.field, String::new());
        }
        registry.register(fields::CPU_SUPPORT, 0_usize);
    }

    fn bind(ctx: &SyncContext, registry: &FieldRegistry) -> Vec<Subscription> {
        let prime95 = ctx.section(sections::PRIME95);
        let mut subs = MODE.attach(&prime95, registry);
        subs.extend(FFT_SIZE.attach(&prime95, registry));

        let custom = ctx.section(sections::PRIME95_CUSTOM);
        for torture in TORTURE {
            subs.extend(torture.attach(&custom, registry));
        }
        subs.extend(CPU_SUPPORT.attach(&custom, registry));
        subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::testing::{bind, field};
    use crate::sync::Notice;

    #[test]
    fn test_mode_override_precedence() {
        let (h, registry, _subs) = bind::<Prime95>("[Prime95]\nmode = AVX2\n");
        let check = field::<bool>(&registry, fields::MODE_OVERRIDE);
        let text = field::<String>(&registry, fields::MODE_CUSTOM);

        check.set(true);
        assert_eq!(h.stored("Prime95", "mode").as_deref(), Some("custom"));
        text.set("minimum".to_string());
        assert_eq!(h.stored("Prime95", "mode").as_deref(), Some("minimum"));
        check.set(false);
        assert_eq!(h.stored("Prime95", "mode").as_deref(), Some("AVX2"));
        assert_eq!(text.get(), "");
    }

    #[test]
    fn test_fft_size_custom_range() {
        let (h, registry, _subs) = bind::<Prime95>("[Prime95]\nfftSize = 720-720\n");
        let choice = field::<usize>(&registry, fields::FFT_SIZE);
        let text = field::<String>(&registry, fields::FFT_SIZE_CUSTOM);
        assert_eq!(choice.get(), 8);
        assert_eq!(text.get(), "720-720");

        text.set(String::new());
        assert_eq!(h.stored("Prime95", "fftSize").as_deref(), Some("Custom"));

        choice.set(5);
        assert_eq!(h.stored("Prime95", "fftSize").as_deref(), Some("Heavy"));
    }

    #[test]
    fn test_default_fft_size_is_small() {
        let (_h, registry, _subs) = bind::<Prime95>("");
        assert_eq!(field::<usize>(&registry, fields::FFT_SIZE).get(), 2);
        assert_eq!(field::<String>(&registry, fields::MAX_TORTURE_FFT).get(), "8192");
    }

    #[test]
    fn test_torture_settings_validate_integers() {
        let (h, registry, _subs) = bind::<Prime95>("[Prime95Custom]\ntorturetime = 6\n");
        let time = field::<String>(&registry, fields::TORTURE_TIME);

        time.set("six".to_string());
        assert_eq!(time.get(), "6");
        assert_eq!(h.stored("Prime95Custom", "torturetime").as_deref(), Some("6"));
        assert!(matches!(h.notifier.notices().as_slice(), [Notice::InvalidInput { key, .. }] if key == "torturetime"));
    }

    #[test]
    fn test_cpu_support_ladder() {
        let (h, registry, _subs) = bind::<Prime95>(
            "[Prime95Custom]\ncpusupportsavx = yes\ncpusupportsavx2 = 1\ncpusupportsfma3 = 1\ncpusupportsavx512 = 0\n",
        );
        let level = field::<usize>(&registry, fields::CPU_SUPPORT);
        assert_eq!(level.get(), 3);

        level.set(1);
        assert_eq!(h.stored("Prime95Custom", "cpusupportsavx").as_deref(), Some("1"));
        assert_eq!(h.stored("Prime95Custom", "cpusupportsavx2").as_deref(), Some("0"));
        assert_eq!(h.stored("Prime95Custom", "cpusupportsfma3").as_deref(), Some("0"));
    }
}
