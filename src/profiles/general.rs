//! `[General]` and `[Update]`

use super::Profile;
use crate::constants::{bounds, sections, tokens};
use crate::field::{FieldRegistry, Subscription};
use crate::sync::{
    Bounds, ChoiceBinding, ChoiceMap, IntCodec, NumberBinding, OptionalTextBinding, OverrideGroup,
    OverrideShape, SyncContext, TextBinding, ToggleBinding,
};

pub mod fields {
    use crate::field::FieldId;

    pub const STRESS_TEST_PROGRAM: FieldId = FieldId::new("general.stressTestProgram");
    pub const SKIP_CORE_ON_ERROR: FieldId = FieldId::new("general.skipCoreOnError");
    pub const STOP_ON_ERROR: FieldId = FieldId::new("general.stopOnError");
    pub const ASSIGN_BOTH_VIRTUAL_CORES: FieldId =
        FieldId::new("general.assignBothVirtualCoresForSingleThread");
    pub const SUSPEND_PERIODICALLY: FieldId = FieldId::new("general.suspendPeriodically");
    pub const BEEP_ON_ERROR: FieldId = FieldId::new("general.beepOnError");
    pub const FLASH_ON_ERROR: FieldId = FieldId::new("general.flashOnError");
    pub const LOOK_FOR_WHEA_ERRORS: FieldId = FieldId::new("general.lookForWheaErrors");
    pub const TREAT_WHEA_WARNING_AS_ERROR: FieldId = FieldId::new("general.treatWheaWarningAsError");
    pub const RESTART_PER_CORE: FieldId = FieldId::new("general.restartTestProgramForEachCore");
    pub const NUMBER_OF_THREADS: FieldId = FieldId::new("general.numberOfThreads");
    pub const MAX_ITERATIONS: FieldId = FieldId::new("general.maxIterations");
    pub const DELAY_BETWEEN_CORES: FieldId = FieldId::new("general.delayBetweenCores");
    pub const RUNTIME_PER_CORE: FieldId = FieldId::new("general.runtimePerCore");
    pub const CORES_TO_IGNORE: FieldId = FieldId::new("general.coresToIgnore");
    pub const CORE_TEST_ORDER: FieldId = FieldId::new("general.coreTestOrder");
    pub const CORE_TEST_ORDER_CUSTOM: FieldId = FieldId::new("general.coreTestOrderCustom");
    pub const USE_CONFIG_FILE_ENABLED: FieldId = FieldId::new("general.useConfigFileEnabled");
    pub const USE_CONFIG_FILE: FieldId = FieldId::new("general.useConfigFile");

    pub const ENABLE_UPDATE_CHECK: FieldId = FieldId::new("update.enableUpdateCheck");
    pub const UPDATE_CHECK_FREQUENCY: FieldId = FieldId::new("update.updateCheckFrequency");
}

/// Stress test program; positions 3 and 4 select the two y-cruncher test families
pub const STRESS_TEST_PROGRAMS: ChoiceMap =
    ChoiceMap::new(&["PRIME95", "LINPACK", "AIDA64", "YCRUNCHER", "YCRUNCHER_OLD"]);
pub const YCRUNCHER_INDEX: usize = 3;
pub const YCRUNCHER_OLD_INDEX: usize = 4;

const STRESS_TEST_PROGRAM: ChoiceBinding = ChoiceBinding {
    field: fields::STRESS_TEST_PROGRAM,
    key: "stressTestProgram",
    choices: STRESS_TEST_PROGRAMS,
    default: "PRIME95",
};

const TOGGLES: [ToggleBinding; 9] = [
    ToggleBinding::numeric(fields::SKIP_CORE_ON_ERROR, "skipCoreOnError"),
    ToggleBinding::numeric(fields::STOP_ON_ERROR, "stopOnError"),
    ToggleBinding::numeric(fields::ASSIGN_BOTH_VIRTUAL_CORES, "assignBothVirtualCoresForSingleThread"),
    ToggleBinding::numeric(fields::SUSPEND_PERIODICALLY, "suspendPeriodically"),
    ToggleBinding::numeric(fields::BEEP_ON_ERROR, "beepOnError"),
    ToggleBinding::numeric(fields::FLASH_ON_ERROR, "flashOnError"),
    ToggleBinding::numeric(fields::LOOK_FOR_WHEA_ERRORS, "lookForWheaErrors"),
    ToggleBinding::numeric(fields::TREAT_WHEA_WARNING_AS_ERROR, "treatWheaWarningAsError"),
    ToggleBinding::numeric(fields::RESTART_PER_CORE, "restartTestProgramForEachCore"),
];

const NUMBERS: [NumberBinding; 4] = [
    NumberBinding::plain(fields::NUMBER_OF_THREADS, "numberOfThreads", 1, bounds::NUMBER_OF_THREADS),
    NumberBinding::plain(fields::MAX_ITERATIONS, "maxIterations", 5, bounds::MAX_ITERATIONS),
    NumberBinding::plain(fields::DELAY_BETWEEN_CORES, "delayBetweenCores", 15, bounds::DELAY_BETWEEN_CORES),
    NumberBinding {
        field: fields::RUNTIME_PER_CORE,
        key: "runtimePerCore",
        default: 0,
        bounds: Bounds::new(bounds::RUNTIME_PER_CORE_MINUTES),
        codec: IntCodec::Minutes,
    },
];

const CORES_TO_IGNORE: TextBinding = TextBinding {
    field: fields::CORES_TO_IGNORE,
    key: "coresToIgnore",
    default: "",
    empty_fallback: None,
};

const CORE_TEST_ORDER: OverrideGroup = OverrideGroup {
    choice: fields::CORE_TEST_ORDER,
    text: fields::CORE_TEST_ORDER_CUSTOM,
    key: "coreTestOrder",
    choices: ChoiceMap::new(&["Default", "Alternate", "Sequential", "Random", tokens::CUSTOM]),
    default: "Default",
    shape: OverrideShape::InBand { custom_index: 4 },
    fallback: tokens::CUSTOM,
};

const USE_CONFIG_FILE: OptionalTextBinding = OptionalTextBinding {
    toggle: fields::USE_CONFIG_FILE_ENABLED,
    field: fields::USE_CONFIG_FILE,
    key: "useConfigFile",
};

const ENABLE_UPDATE_CHECK: ToggleBinding =
    ToggleBinding::lenient(fields::ENABLE_UPDATE_CHECK, "enableUpdateCheck");

const UPDATE_CHECK_FREQUENCY: NumberBinding = NumberBinding {
    field: fields::UPDATE_CHECK_FREQUENCY,
    key: "updateCheckFrequency",
    default: 1,
    bounds: Bounds::new(bounds::UPDATE_FREQUENCY_DAYS),
    codec: IntCodec::DaysAsHours,
};

pub struct General;

impl Profile for General {
    const NAME: &'static str = sections::GENERAL;

    fn declare_fields(registry: &mut FieldRegistry) {
        registry.register(fields::STRESS_TEST_PROGRAM, 0_usize);
        for toggle in TOGGLES {
            registry.register(toggle.field, false);
        }
        for number in NUMBERS {
            registry.register(number.field, 0_i64);
        }
        registry.register(fields::CORES_TO_IGNORE, String::new());
        registry.register(fields::CORE_TEST_ORDER, 0_usize);
        registry.register(fields::CORE_TEST_ORDER_CUSTOM, String::new());
        registry.register(fields::USE_CONFIG_FILE_ENABLED, false);
        registry.register(fields::USE_CONFIG_FILE, String::new());

        registry.register(fields::ENABLE_UPDATE_CHECK, false);
        registry.register(fields::UPDATE_CHECK_FREQUENCY, 0_i64);
    }

    fn bind(ctx: &SyncContext, registry: &FieldRegistry) -> Vec<Subscription> {
        let general = ctx.section(sections::GENERAL);
        let mut subs = STRESS_TEST_PROGRAM.attach(&general, registry);
        for toggle in TOGGLES {
            subs.extend(toggle.attach(&general, registry));
        }
        for number in NUMBERS {
            subs.extend(number.attach(&general, registry));
        }
        subs.extend(CORES_TO_IGNORE.attach(&general, registry));
        subs.extend(CORE_TEST_ORDER.attach(&general, registry));
        subs.extend(USE_CONFIG_FILE.attach(&general, registry));

        let update = ctx.section(sections::UPDATE);
        subs.extend(ENABLE_UPDATE_CHECK.attach(&update, registry));
        subs.extend(UPDATE_CHECK_FREQUENCY.attach(&update, registry));
        subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::testing::{bind, field};

    #[test]
    fn test_defaults_on_empty_store() {
        let (_h, registry, _subs) = bind::<General>("");
        assert_eq!(field::<usize>(&registry, fields::STRESS_TEST_PROGRAM).get(), 0);
        assert_eq!(field::<i64>(&registry, fields::MAX_ITERATIONS).get(), 5);
        assert_eq!(field::<i64>(&registry, fields::DELAY_BETWEEN_CORES).get(), 15);
        assert_eq!(field::<i64>(&registry, fields::RUNTIME_PER_CORE).get(), 0);
        assert_eq!(field::<i64>(&registry, fields::UPDATE_CHECK_FREQUENCY).get(), 1);
        assert_eq!(field::<usize>(&registry, fields::CORE_TEST_ORDER).get(), 0);
    }

    #[test]
    fn test_general_toggles_are_numeric() {
        let (h, registry, _subs) = bind::<General>("[General]\nstopOnError = 1\nbeepOnError = yes\n");
        let stop = field::<bool>(&registry, fields::STOP_ON_ERROR);
        let beep = field::<bool>(&registry, fields::BEEP_ON_ERROR);
        assert!(stop.get());
        assert!(!beep.get());

        beep.set(true);
        assert_eq!(h.stored("General", "beepOnError").as_deref(), Some("1"));
    }

    #[test]
    fn test_runtime_per_core_round_trip() {
        let (h, registry, _subs) = bind::<General>("[General]\nruntimePerCore = auto\n");
        let runtime = field::<i64>(&registry, fields::RUNTIME_PER_CORE);
        assert_eq!(runtime.get(), 0);

        runtime.set(45);
        assert_eq!(h.stored("General", "runtimePerCore").as_deref(), Some("45m"));
        runtime.set(0);
        assert_eq!(h.stored("General", "runtimePerCore").as_deref(), Some("auto"));

        let (_h, registry, _subs) = bind::<General>("[General]\nruntimePerCore = 45m\n");
        assert_eq!(field::<i64>(&registry, fields::RUNTIME_PER_CORE).get(), 45);
    }

    #[test]
    fn test_update_frequency_stored_in_hours() {
        let (h, registry, _subs) = bind::<General>("[Update]\nenableUpdateCheck = True\nupdateCheckFrequency = 72\n");
        assert!(field::<bool>(&registry, fields::ENABLE_UPDATE_CHECK).get());
        let days = field::<i64>(&registry, fields::UPDATE_CHECK_FREQUENCY);
        assert_eq!(days.get(), 3);

        days.set(14);
        assert_eq!(h.stored("Update", "updateCheckFrequency").as_deref(), Some("336"));
    }
}
