use crate::actions::ActionLog;
use crate::detect::opengl::GlVendor;
use crate::detect::pci::{Inventory, PciFunction};
use crate::persist;
use crate::profile::{Observation, Profile};
use crate::reconcile::{self, DriverState};
use crate::system::{Host, SystemOps};
use serde::Serialize;

/// A single side effect of a profile change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    WriteBlacklist,
    RemoveBlacklist,
    ConfigureHelper,
    RemovePowerRules,
    ClearHelperSettings,
    WritePowerRules,
    /// Hot-unplug a sibling function of the GPU core.
    RemovePciFunction(PciFunction),
}

impl Step {
    pub fn description(&self) -> String {
        match self {
            Step::WriteBlacklist => format!("write /{}", persist::BLACKLIST_PATH),
            Step::RemoveBlacklist => format!("remove /{}", persist::BLACKLIST_PATH),
            Step::ConfigureHelper => "configure GPU with the driver management helper".to_string(),
            Step::RemovePowerRules => format!("remove /{}", persist::POWER_RULES_PATH),
            Step::ClearHelperSettings => "clear driver management helper settings".to_string(),
            Step::WritePowerRules => format!("write /{}", persist::POWER_RULES_PATH),
            Step::RemovePciFunction(f) => format!("remove PCI function {}", f.address),
        }
    }
}

/// Everything a profile change will do, decided before anything is touched.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionPlan {
    pub from: Option<Profile>,
    pub to: Profile,
    pub steps: Vec<Step>,
    /// The OpenGL vendor changes, so the display stack must restart.
    pub reboot_required: bool,
}

impl TransitionPlan {
    pub fn reconcile_after(&self) -> bool {
        !self.reboot_required
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionOutcome {
    AlreadySet,
    RebootRequired,
    Reconfigured,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub from: Option<Profile>,
    pub to: Profile,
    pub outcome: TransitionOutcome,
    pub actions: ActionLog,
    /// Set when the live reconciliation pass ran.
    pub driver: Option<DriverState>,
}

/// Compute the steps from the observed state to `target`.
/// `None` when `target` is already the current profile.
pub fn plan(
    target: Profile,
    current: Option<Profile>,
    current_vendor: GlVendor,
    inventory: &Inventory,
) -> Option<TransitionPlan> {
    if current == Some(target) {
        return None;
    }

    let mut steps = Vec::new();

    if target == Profile::Intel {
        steps.push(Step::WriteBlacklist);
    } else {
        steps.push(Step::RemoveBlacklist);
    }

    if target == Profile::Nvidia {
        steps.push(Step::ConfigureHelper);
        steps.push(Step::RemovePowerRules);
    } else {
        steps.push(Step::ClearHelperSettings);
        steps.push(Step::WritePowerRules);
        steps.extend(inventory.secondaries().cloned().map(Step::RemovePciFunction));
    }

    Some(TransitionPlan {
        from: current,
        to: target,
        steps,
        reboot_required: target.gl_vendor() != current_vendor,
    })
}

/// Observe the machine and plan the change to `target`.
pub fn plan_for<O: SystemOps>(
    host: &mut Host<O>,
    inventory: &Inventory,
    target: Profile,
) -> Option<TransitionPlan> {
    let observed = Observation::observe(host);
    plan(target, observed.profile(), observed.vendor, inventory)
}

/// Switch to `target`. Repeating an already-active profile touches nothing.
pub fn apply<O: SystemOps>(host: &mut Host<O>, inventory: &Inventory, target: Profile) -> Transition {
    match plan_for(host, inventory, target) {
        Some(plan) => execute(host, inventory, &plan),
        None => Transition {
            from: Some(target),
            to: target,
            outcome: TransitionOutcome::AlreadySet,
            actions: ActionLog::new(),
            driver: None,
        },
    }
}

/// Run a plan's steps in order, then reconcile live if the vendor is unchanged.
pub fn execute<O: SystemOps>(
    host: &mut Host<O>,
    inventory: &Inventory,
    plan: &TransitionPlan,
) -> Transition {
    let mut actions = ActionLog::new();
    for step in &plan.steps {
        execute_step(host, step, &mut actions);
    }

    if !plan.reconcile_after() {
        return Transition {
            from: plan.from,
            to: plan.to,
            outcome: TransitionOutcome::RebootRequired,
            actions,
            driver: None,
        };
    }

    let live = reconcile::reconcile(host, inventory);
    actions.extend(live.actions);

    Transition {
        from: plan.from,
        to: plan.to,
        outcome: TransitionOutcome::Reconfigured,
        actions,
        driver: Some(live.driver),
    }
}

fn execute_step<O: SystemOps>(host: &mut Host<O>, step: &Step, log: &mut ActionLog) -> bool {
    let name = step.description();
    match step {
        Step::WriteBlacklist => log.attempt(name, persist::write_blacklist(&host.root)),
        Step::RemoveBlacklist => log.attempt(name, persist::remove_blacklist(&host.root)),
        Step::ConfigureHelper => {
            let ok = host.helper.configure_gpu(&mut host.ops);
            log.record(name, ok)
        }
        Step::RemovePowerRules => log.attempt(name, persist::remove_power_rules(&host.root)),
        Step::ClearHelperSettings => {
            log.attempt(name, persist::clear_helper_settings(&host.root))
        }
        Step::WritePowerRules => log.attempt(name, persist::write_power_rules(&host.root)),
        Step::RemovePciFunction(function) => {
            let remove = format!("{}/remove", function.sysfs_dir());
            log.attempt(name, host.root.write(remove, "1"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::pci::parse_lspci;

    fn inventory() -> Inventory {
        Inventory::new(parse_lspci(
            "0000:01:00.0 VGA compatible controller: NVIDIA\n\
             0000:01:00.1 Audio device: NVIDIA\n\
             0000:01:00.2 USB controller: NVIDIA\n",
        ))
    }

    fn removed(plan: &TransitionPlan) -> Vec<&str> {
        plan.steps
            .iter()
            .filter_map(|s| match s {
                Step::RemovePciFunction(f) => Some(f.address.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_same_profile_has_no_plan() {
        for profile in Profile::ALL {
            assert!(plan(profile, Some(profile), profile.gl_vendor(), &inventory()).is_none());
        }
    }

    #[test]
    fn test_plan_to_intel_from_hybrid() {
        let plan = plan(Profile::Intel, Some(Profile::Hybrid), GlVendor::Intel, &inventory()).unwrap();
        assert_eq!(plan.steps[0], Step::WriteBlacklist);
        assert_eq!(plan.steps[1], Step::ClearHelperSettings);
        assert_eq!(plan.steps[2], Step::WritePowerRules);
        assert_eq!(removed(&plan), vec!["0000:01:00.1", "0000:01:00.2"]);
        assert!(!plan.reboot_required);
        assert!(plan.reconcile_after());
    }

    #[test]
    fn test_plan_to_nvidia_needs_reboot() {
        let plan = plan(Profile::Nvidia, Some(Profile::Intel), GlVendor::Intel, &inventory()).unwrap();
        assert_eq!(
            plan.steps,
            vec![Step::RemoveBlacklist, Step::ConfigureHelper, Step::RemovePowerRules]
        );
        assert!(plan.reboot_required);
    }

    #[test]
    fn test_plan_from_nvidia_to_hybrid_needs_reboot() {
        let plan = plan(Profile::Hybrid, Some(Profile::Nvidia), GlVendor::Nvidia, &inventory()).unwrap();
        assert_eq!(plan.steps[0], Step::RemoveBlacklist);
        assert!(plan.steps.contains(&Step::WritePowerRules));
        assert!(!plan.steps.contains(&Step::ConfigureHelper));
        assert!(plan.reboot_required);
    }

    #[test]
    fn test_unknown_vendor_counts_as_vendor_change() {
        let plan = plan(Profile::Intel, None, GlVendor::Unknown, &inventory()).unwrap();
        assert!(plan.reboot_required);
        assert_eq!(plan.from, None);
    }

    #[test]
    fn test_branches_are_exclusive() {
        for target in Profile::ALL {
            let plan = plan(target, None, GlVendor::Unknown, &inventory()).unwrap();
            let nvidia_branch = plan.steps.contains(&Step::ConfigureHelper);
            let other_branch = plan.steps.contains(&Step::WritePowerRules);
            assert!(nvidia_branch != other_branch, "{target}");
            assert_eq!(
                plan.steps.contains(&Step::WriteBlacklist),
                target == Profile::Intel
            );
        }
    }
}
