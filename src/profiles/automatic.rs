//! `[AutomaticTestMode]`

use super::Profile;
use crate::constants::{bounds, sections, tokens};
use crate::field::{FieldRegistry, Subscription};
use crate::sync::{NumberBinding, SyncContext, TextBinding, ToggleBinding};

pub mod fields {
    use crate::field::FieldId;

    pub const ENABLE_AUTOMATIC_ADJUSTMENT: FieldId = FieldId::new("automatic.enableAutomaticAdjustment");
    pub const REPEAT_CORE_ON_ERROR: FieldId = FieldId::new("automatic.repeatCoreOnError");
    pub const ENABLE_RESUME: FieldId = FieldId::new("automatic.enableResumeAfterUnexpectedExit");
    pub const MAX_VALUE: FieldId = FieldId::new("automatic.maxValue");
    pub const INCREMENT_BY: FieldId = FieldId::new("automatic.incrementBy");
    pub const START_VALUES: FieldId = FieldId::new("automatic.startValues");
}

const TOGGLES: [ToggleBinding; 3] = [
    ToggleBinding::lenient(fields::ENABLE_AUTOMATIC_ADJUSTMENT, "enableAutomaticAdjustment"),
    ToggleBinding::lenient(fields::REPEAT_CORE_ON_ERROR, "repeatCoreOnError"),
    ToggleBinding::lenient(fields::ENABLE_RESUME, "enableResumeAfterUnexpectedExit"),
];

const NUMBERS: [NumberBinding; 2] = [
    NumberBinding::plain(fields::MAX_VALUE, "maxValue", 5, bounds::AUTOMATIC_MAX_VALUE),
    NumberBinding::plain(fields::INCREMENT_BY, "incrementBy", 1, bounds::AUTOMATIC_INCREMENT_BY),
];

const START_VALUES: TextBinding = TextBinding {
    field: fields::START_VALUES,
    key: "startValues",
    default: tokens::DEFAULT,
    empty_fallback: Some(tokens::DEFAULT),
};

pub struct AutomaticTestMode;

impl Profile for AutomaticTestMode {
    const NAME: &'static str = sections::AUTOMATIC_TEST_MODE;

    fn declare_fields(registry: &mut FieldRegistry) {
        for toggle in TOGGLES {
            registry.register(toggle.field, false);
        }
        for number in NUMBERS {
            registry.register(number.field, 0_i64);
        }
        registry.register(fields::START_VALUES, String::new());
    }

    fn bind(ctx: &SyncContext, registry: &FieldRegistry) -> Vec<Subscription> {
        let section = ctx.section(sections::AUTOMATIC_TEST_MODE);
        let mut subs = Vec::new();
        for toggle in TOGGLES {
            subs.extend(toggle.attach(&section, registry));
        }
        for number in NUMBERS {
            subs.extend(number.attach(&section, registry));
        }
        subs.extend(START_VALUES.attach(&section, registry));
        subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::testing::{bind, field};

    #[test]
    fn test_load_with_defaults() {
        let (_h, registry, _subs) = bind::<AutomaticTestMode>("[AutomaticTestMode]\nrepeatCoreOnError = on\n");
        assert!(!field::<bool>(&registry, fields::ENABLE_AUTOMATIC_ADJUSTMENT).get());
        assert!(field::<bool>(&registry, fields::REPEAT_CORE_ON_ERROR).get());
        assert_eq!(field::<i64>(&registry, fields::MAX_VALUE).get(), 5);
        assert_eq!(field::<i64>(&registry, fields::INCREMENT_BY).get(), 1);
        assert_eq!(field::<String>(&registry, fields::START_VALUES).get(), "Default");
    }

    #[test]
    fn test_negative_max_value_and_start_values() {
        let (h, registry, _subs) = bind::<AutomaticTestMode>("[AutomaticTestMode]\nmaxValue = -250\n");
        let max_value = field::<i64>(&registry, fields::MAX_VALUE);
        assert_eq!(max_value.get(), -100);
        assert_eq!(h.stored("AutomaticTestMode", "maxValue").as_deref(), Some("-250"));

        max_value.set(-30);
        assert_eq!(h.stored("AutomaticTestMode", "maxValue").as_deref(), Some("-30"));

        let start = field::<String>(&registry, fields::START_VALUES);
        start.set(String::new());
        assert_eq!(h.stored("AutomaticTestMode", "startValues").as_deref(), Some("Default"));
    }
}
