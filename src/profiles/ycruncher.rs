//! `[yCruncher]`
//!
//! The modern and legacy test families share the `tests` key. Which one owns it
//! follows the General stress test program selector.

use super::Profile;
use super::general::{self, YCRUNCHER_INDEX, YCRUNCHER_OLD_INDEX};
use crate::constants::{bounds, sections, tokens};
use crate::field::{FieldId, FieldRegistry, Subscription};
use crate::sync::number::Sentinel;
use crate::sync::{
    ChoiceBinding, ChoiceMap, DecimalBinding, Gate, NumberBinding, SyncContext, TestSetBinding,
    ToggleBinding,
};

pub mod fields {
    use crate::field::FieldId;

    pub const MODE: FieldId = FieldId::new("ycruncher.mode");
    pub const TEST_DURATION: FieldId = FieldId::new("ycruncher.testDuration");
    pub const LOGGING_WRAPPER: FieldId = FieldId::new("ycruncher.enableycruncherloggingwrapper");
    pub const MEMORY: FieldId = FieldId::new("ycruncher.memory");
    pub const MEMORY_DEFAULT: FieldId = FieldId::new("ycruncher.memoryDefault");

    pub const MODERN_BKT: FieldId = FieldId::new("ycruncher.tests.modern.BKT");
    pub const MODERN_BBP: FieldId = FieldId::new("ycruncher.tests.modern.BBP");
    pub const MODERN_SFT: FieldId = FieldId::new("ycruncher.tests.modern.SFT");
    pub const MODERN_SFTV4: FieldId = FieldId::new("ycruncher.tests.modern.SFTv4");
    pub const MODERN_SNT: FieldId = FieldId::new("ycruncher.tests.modern.SNT");
    pub const MODERN_SVT: FieldId = FieldId::new("ycruncher.tests.modern.SVT");
    pub const MODERN_FFT: FieldId = FieldId::new("ycruncher.tests.modern.FFT");
    pub const MODERN_FFTV4: FieldId = FieldId::new("ycruncher.tests.modern.FFTv4");
    pub const MODERN_N63: FieldId = FieldId::new("ycruncher.tests.modern.N63");
    pub const MODERN_VT3: FieldId = FieldId::new("ycruncher.tests.modern.VT3");

    pub const LEGACY_BKT: FieldId = FieldId::new("ycruncher.tests.legacy.BKT");
    pub const LEGACY_BBP: FieldId = FieldId::new("ycruncher.tests.legacy.BBP");
    pub const LEGACY_SFT: FieldId = FieldId::new("ycruncher.tests.legacy.SFT");
    pub const LEGACY_FFT: FieldId = FieldId::new("ycruncher.tests.legacy.FFT");
    pub const LEGACY_N32: FieldId = FieldId::new("ycruncher.tests.legacy.N32");
    pub const LEGACY_N64: FieldId = FieldId::new("ycruncher.tests.legacy.N64");
    pub const LEGACY_HNT: FieldId = FieldId::new("ycruncher.tests.legacy.HNT");
    pub const LEGACY_VST: FieldId = FieldId::new("ycruncher.tests.legacy.VST");
    pub const LEGACY_C17: FieldId = FieldId::new("ycruncher.tests.legacy.C17");
}

const MODE: ChoiceBinding = ChoiceBinding {
    field: fields::MODE,
    key: "mode",
    choices: ChoiceMap::new(&[
        "04-P4P",
        "05-A64 ~ Kasumi",
        "08-NHM ~ Ushio",
        "11-SNB ~ Hina",
        "12-BD2 ~ Miyu",
        "13-HSW ~ Airi",
        "14-BDW ~ Kurumi",
        "17-SKX ~ Kotori",
        "17-ZN1 ~ Yukina",
        "18-CNL ~ Shinoa",
        "19-ZN2 ~ Kagari",
        "22-ZN4 ~ Kizuna",
        "24-ZN5 ~ Komari",
    ]),
    default: "04-P4P",
};

const MODERN_TESTS: &[(&str, FieldId)] = &[
    ("BKT", fields::MODERN_BKT),
    ("BBP", fields::MODERN_BBP),
    ("SFT", fields::MODERN_SFT),
    ("SFTv4", fields::MODERN_SFTV4),
    ("SNT", fields::MODERN_SNT),
    ("SVT", fields::MODERN_SVT),
    ("FFT", fields::MODERN_FFT),
    ("FFTv4", fields::MODERN_FFTV4),
    ("N63", fields::MODERN_N63),
    ("VT3", fields::MODERN_VT3),
];

const LEGACY_TESTS: &[(&str, FieldId)] = &[
    ("BKT", fields::LEGACY_BKT),
    ("BBP", fields::LEGACY_BBP),
    ("SFT", fields::LEGACY_SFT),
    ("FFT", fields::LEGACY_FFT),
    ("N32", fields::LEGACY_N32),
    ("N64", fields::LEGACY_N64),
    ("HNT", fields::LEGACY_HNT),
    ("VST", fields::LEGACY_VST),
    ("C17", fields::LEGACY_C17),
];

const TEST_SETS: [TestSetBinding; 2] = [
    TestSetBinding {
        key: "tests",
        tests: MODERN_TESTS,
        default: "",
        gate: Gate::When {
            selector: general::fields::STRESS_TEST_PROGRAM,
            active: YCRUNCHER_INDEX,
        },
        empty_fallback: "",
    },
    TestSetBinding {
        key: "tests",
        tests: LEGACY_TESTS,
        default: "",
        gate: Gate::When {
            selector: general::fields::STRESS_TEST_PROGRAM,
            active: YCRUNCHER_OLD_INDEX,
        },
        empty_fallback: "",
    },
];

const TEST_DURATION: NumberBinding =
    NumberBinding::plain(fields::TEST_DURATION, "testDuration", 60, bounds::YCRUNCHER_TEST_DURATION);

const LOGGING_WRAPPER: ToggleBinding =
    ToggleBinding::lenient(fields::LOGGING_WRAPPER, "enableycruncherloggingwrapper");

const MEMORY: DecimalBinding = DecimalBinding {
    field: fields::MEMORY,
    key: "memory",
    default: 256.0,
    bounds: bounds::YCRUNCHER_MEMORY,
    sentinel: Some(Sentinel {
        toggle: fields::MEMORY_DEFAULT,
        token: tokens::DEFAULT,
    }),
};

pub struct YCruncher;

impl Profile for YCruncher {
    const NAME: &'static str = sections::YCRUNCHER;

    fn declare_fields(registry: &mut FieldRegistry) {
        registry.register(fields::MODE, 0_usize);
        for set in TEST_SETS {
            for (_, id) in set.tests {
                registry.register(*id, false);
            }
        }
        registry.register(fields::TEST_DURATION, 0_i64);
        registry.register(fields::LOGGING_WRAPPER, false);
        registry.register(fields::MEMORY, 0.0_f64);
        registry.register(fields::MEMORY_DEFAULT, false);
    }

    fn bind(ctx: &SyncContext, registry: &FieldRegistry) -> Vec<Subscription> {
        let section = ctx.section(sections::YCRUNCHER);
        let mut subs = MODE.attach(&section, registry);
        for set in TEST_SETS {
            subs.extend(set.attach(&section, registry));
        }
        subs.extend(TEST_DURATION.attach(&section, registry));
        subs.extend(LOGGING_WRAPPER.attach(&section, registry));
        subs.extend(MEMORY.attach(&section, registry));
        subs
    }
}
