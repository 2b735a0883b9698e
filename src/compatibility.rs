//! Compatibility rules evaluated over a (possibly partial) build.
//!
//! Rules only fire when every slot they inspect is filled; an empty slot is
//! never an issue. Issues are advisory and never block saving a build.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::aggregates::recommended_psu_wattage;
use crate::domain::build::BuildState;
use crate::domain::category::Category;
use crate::domain::product::Product;

const FORM_FACTOR_ATX: &str = "ATX";
const FORM_FACTOR_MICRO_ATX: &str = "Micro-ATX";
const FORM_FACTOR_MINI_ITX: &str = "Mini-ITX";

/// Which check produced an issue. Variants are listed in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityRule {
    Socket,
    MemoryType,
    Power,
    FormFactor,
    GpuLength,
}

impl CompatibilityRule {
    /// Slots inspected by this rule.
    pub const fn categories(self) -> &'static [Category] {
        match self {
            Self::Socket => &[Category::Cpu, Category::Motherboard],
            Self::MemoryType => &[Category::Ram, Category::Motherboard],
            Self::Power => &[Category::Psu],
            Self::FormFactor => &[Category::Case, Category::Motherboard],
            Self::GpuLength => &[Category::Case, Category::Gpu],
        }
    }

    pub fn involves(self, category: Category) -> bool {
        self.categories().contains(&category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The build works but is outside the recommended margin.
    Warning,
    /// Parts cannot be combined.
    Error,
    /// The system cannot run as configured.
    Critical,
}

/// Values that explain a single issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueDetail {
    SocketMismatch {
        cpu: Option<String>,
        motherboard: Option<String>,
    },
    MemoryTypeMismatch {
        motherboard: Option<String>,
        ram: Option<String>,
    },
    PsuOverloaded {
        draw: f64,
        capacity: f64,
    },
    PsuLowHeadroom {
        recommended: f64,
        capacity: f64,
    },
    BoardDoesNotFit {
        board: String,
        case: String,
    },
    BoardTooBigForMiniItx {
        board: String,
    },
    GpuTooLong {
        gpu_length: f64,
        case_max: f64,
    },
}

impl IssueDetail {
    pub fn rule(&self) -> CompatibilityRule {
        match self {
            Self::SocketMismatch { .. } => CompatibilityRule::Socket,
            Self::MemoryTypeMismatch { .. } => CompatibilityRule::MemoryType,
            Self::PsuOverloaded { .. } | Self::PsuLowHeadroom { .. } => CompatibilityRule::Power,
            Self::BoardDoesNotFit { .. } | Self::BoardTooBigForMiniItx { .. } => {
                CompatibilityRule::FormFactor
            }
            Self::GpuTooLong { .. } => CompatibilityRule::GpuLength,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::PsuOverloaded { .. } => Severity::Critical,
            Self::PsuLowHeadroom { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A structured compatibility finding. `Display` renders the message shown
/// to users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityIssue {
    pub rule: CompatibilityRule,
    pub severity: Severity,
    pub detail: IssueDetail,
}

impl From<IssueDetail> for CompatibilityIssue {
    fn from(detail: IssueDetail) -> Self {
        Self {
            rule: detail.rule(),
            severity: detail.severity(),
            detail,
        }
    }
}

fn or_unknown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("unknown")
}

impl Display for CompatibilityIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            IssueDetail::SocketMismatch { cpu, motherboard } => write!(
                f,
                "Incompatibility: CPU requires socket {}, and motherboard has {}",
                or_unknown(cpu),
                or_unknown(motherboard)
            ),
            IssueDetail::MemoryTypeMismatch { motherboard, ram } => write!(
                f,
                "Incompatibility: Board supports {}, and memory {}",
                or_unknown(motherboard),
                or_unknown(ram)
            ),
            IssueDetail::PsuOverloaded { draw, capacity } => write!(
                f,
                "CRITICAL: PSU is too weak! System uses {draw}W, PSU has {capacity}W."
            ),
            IssueDetail::PsuLowHeadroom { recommended, .. } => write!(
                f,
                "Warning: Low PSU headroom. Recommended: {recommended}W (+20% buffer)."
            ),
            IssueDetail::BoardDoesNotFit { board, case } => write!(
                f,
                "Physical incompatibility: Board {board} will not fit in case {case}!"
            ),
            IssueDetail::BoardTooBigForMiniItx { .. } => {
                f.write_str("The board is too big for this Mini-ITX case.")
            }
            IssueDetail::GpuTooLong {
                gpu_length,
                case_max,
            } => write!(
                f,
                "Physical: GPU is too long ({gpu_length}mm)! Case max: {case_max}mm."
            ),
        }
    }
}

fn check_socket(cpu: &Product, motherboard: &Product) -> Option<IssueDetail> {
    (cpu.specs.socket != motherboard.specs.socket).then(|| IssueDetail::SocketMismatch {
        cpu: cpu.specs.socket.clone(),
        motherboard: motherboard.specs.socket.clone(),
    })
}

fn check_memory_type(ram: &Product, motherboard: &Product) -> Option<IssueDetail> {
    (ram.specs.memory_type != motherboard.specs.memory_type).then(|| {
        IssueDetail::MemoryTypeMismatch {
            motherboard: motherboard.specs.memory_type.clone(),
            ram: ram.specs.memory_type.clone(),
        }
    })
}

fn check_power(psu: &Product, total_wattage: f64) -> Option<IssueDetail> {
    let capacity = psu.wattage();
    let recommended = recommended_psu_wattage(total_wattage);
    if capacity < total_wattage {
        Some(IssueDetail::PsuOverloaded {
            draw: total_wattage,
            capacity,
        })
    } else if capacity < recommended {
        Some(IssueDetail::PsuLowHeadroom {
            recommended,
            capacity,
        })
    } else {
        None
    }
}

fn check_form_factor(case: &Product, motherboard: &Product) -> Option<IssueDetail> {
    let case_size = case.specs.form_factor.as_deref()?;
    let board_size = motherboard.specs.form_factor.as_deref()?;
    match (case_size, board_size) {
        (FORM_FACTOR_MICRO_ATX, FORM_FACTOR_ATX) => Some(IssueDetail::BoardDoesNotFit {
            board: board_size.to_string(),
            case: case_size.to_string(),
        }),
        (FORM_FACTOR_MINI_ITX, FORM_FACTOR_ATX | FORM_FACTOR_MICRO_ATX) => {
            Some(IssueDetail::BoardTooBigForMiniItx {
                board: board_size.to_string(),
            })
        }
        _ => None,
    }
}

fn check_gpu_length(case: &Product, gpu: &Product) -> Option<IssueDetail> {
    // A zero measurement means the catalog does not know it.
    let case_max = case.specs.max_gpu_length.map(|l| l.get()).filter(|l| *l > 0.0)?;
    let gpu_length = gpu.specs.length.map(|l| l.get()).filter(|l| *l > 0.0)?;
    (gpu_length > case_max).then_some(IssueDetail::GpuTooLong {
        gpu_length,
        case_max,
    })
}

/// Evaluate every rule against `build` in fixed order.
///
/// `total_wattage` is the consumption of the build as computed by
/// [`crate::aggregates::total_wattage`]; it is taken as an argument so
/// callers that already hold it do not recompute it.
pub fn validate(build: &BuildState, total_wattage: f64) -> Vec<CompatibilityIssue> {
    let cpu = build.get(Category::Cpu);
    let motherboard = build.get(Category::Motherboard);
    let ram = build.get(Category::Ram);
    let gpu = build.get(Category::Gpu);
    let psu = build.get(Category::Psu);
    let case = build.get(Category::Case);

    [
        cpu.zip(motherboard).and_then(|(c, m)| check_socket(c, m)),
        ram.zip(motherboard)
            .and_then(|(r, m)| check_memory_type(r, m)),
        psu.and_then(|p| check_power(p, total_wattage)),
        case.zip(motherboard)
            .and_then(|(c, m)| check_form_factor(c, m)),
        case.zip(gpu).and_then(|(c, g)| check_gpu_length(c, g)),
    ]
    .into_iter()
    .flatten()
    .map(CompatibilityIssue::from)
    .collect()
}

/// [`validate`] rendered to display strings.
pub fn validate_messages(build: &BuildState, total_wattage: f64) -> Vec<String> {
    validate(build, total_wattage)
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Whether placing `candidate` into its slot of `build` keeps the physical
/// rules (socket, memory type, form factor, GPU length) that touch its slot
/// satisfied.
///
/// Power is not considered: headroom depends on the whole build, not on a
/// single part. Issues between other slots do not disqualify a candidate.
pub fn is_compatible_candidate(build: &BuildState, candidate: &Product) -> bool {
    let category = candidate.category;
    let mut trial = build.clone();
    if trial.set(category, candidate.clone()).is_err() {
        return false;
    }
    !validate(&trial, 0.0)
        .iter()
        .any(|issue| issue.rule != CompatibilityRule::Power && issue.rule.involves(category))
}

/// Products of `category` that fit the current build.
pub fn compatible_products<'a>(
    build: &BuildState,
    category: Category,
    products: &'a [Product],
) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| product.category == category)
        .filter(|product| is_compatible_candidate(build, product))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::total_wattage;
    use crate::domain::test::product_with;
    use crate::domain::types::ProductId;
    use serde_json::json;

    fn build_of(products: Vec<Product>) -> BuildState {
        let mut build = BuildState::empty();
        for product in products {
            build.set(product.category, product).unwrap();
        }
        build
    }

    fn cpu(socket: &str) -> Product {
        product_with(1, Category::Cpu, 450.0, json!({ "socket": socket, "wattage": 120 }))
    }

    fn board(socket: &str, memory: &str, form_factor: &str) -> Product {
        product_with(
            2,
            Category::Motherboard,
            220.0,
            json!({ "socket": socket, "memoryType": memory, "formFactor": form_factor }),
        )
    }

    fn ram(memory: &str) -> Product {
        product_with(3, Category::Ram, 150.0, json!({ "memoryType": memory, "wattage": 10 }))
    }

    fn psu(wattage: f64) -> Product {
        product_with(4, Category::Psu, 90.0, json!({ "wattage": wattage }))
    }

    fn case(form_factor: &str, max_gpu_length: f64) -> Product {
        product_with(
            5,
            Category::Case,
            120.0,
            json!({ "formFactor": form_factor, "maxGpuLength": max_gpu_length }),
        )
    }

    fn gpu(length: f64) -> Product {
        product_with(6, Category::Gpu, 300.0, json!({ "length": length, "wattage": 115 }))
    }

    fn rules(issues: &[CompatibilityIssue]) -> Vec<CompatibilityRule> {
        issues.iter().map(|issue| issue.rule).collect()
    }

    #[test]
    fn empty_build_has_no_issues() {
        let build = BuildState::empty();
        assert!(validate(&build, total_wattage(&build)).is_empty());
    }

    #[test]
    fn single_parts_never_raise_issues() {
        for product in [cpu("AM5"), board("AM5", "DDR5", "ATX"), ram("DDR4"), gpu(400.0)] {
            let build = build_of(vec![product]);
            assert!(validate(&build, total_wattage(&build)).is_empty());
        }
    }

    #[test]
    fn socket_mismatch_names_both_sockets() {
        let build = build_of(vec![cpu("AM5"), board("LGA1700", "DDR5", "ATX")]);
        let issues = validate(&build, 0.0);

        assert_eq!(rules(&issues), vec![CompatibilityRule::Socket]);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(
            issues[0].to_string(),
            "Incompatibility: CPU requires socket AM5, and motherboard has LGA1700"
        );
    }

    #[test]
    fn matching_sockets_pass() {
        let build = build_of(vec![cpu("AM5"), board("AM5", "DDR5", "ATX")]);
        assert!(validate(&build, 0.0).is_empty());
    }

    #[test]
    fn memory_mismatch_names_both_types() {
        let build = build_of(vec![ram("DDR4"), board("AM5", "DDR5", "ATX")]);
        let issues = validate(&build, 0.0);

        assert_eq!(rules(&issues), vec![CompatibilityRule::MemoryType]);
        assert_eq!(
            issues[0].detail,
            IssueDetail::MemoryTypeMismatch {
                motherboard: Some("DDR5".into()),
                ram: Some("DDR4".into()),
            }
        );
    }

    #[test]
    fn missing_socket_on_one_side_is_a_mismatch() {
        let bare_cpu = product_with(1, Category::Cpu, 100.0, json!({}));
        let build = build_of(vec![bare_cpu, board("AM5", "DDR5", "ATX")]);
        let issues = validate(&build, 0.0);

        assert_eq!(
            issues[0].to_string(),
            "Incompatibility: CPU requires socket unknown, and motherboard has AM5"
        );
    }

    #[test]
    fn overloaded_psu_is_critical_only() {
        let build = build_of(vec![psu(350.0)]);
        let issues = validate(&build, 400.0);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(
            issues[0].to_string(),
            "CRITICAL: PSU is too weak! System uses 400W, PSU has 350W."
        );
    }

    #[test]
    fn thin_headroom_is_a_warning_only() {
        let build = build_of(vec![psu(420.0)]);
        let issues = validate(&build, 400.0);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(
            issues[0].to_string(),
            "Warning: Low PSU headroom. Recommended: 480W (+20% buffer)."
        );
    }

    #[test]
    fn sufficient_psu_passes() {
        let build = build_of(vec![psu(500.0)]);
        assert!(validate(&build, 400.0).is_empty());
        let build = build_of(vec![psu(480.0)]);
        assert!(validate(&build, 400.0).is_empty());
    }

    #[test]
    fn atx_board_does_not_fit_micro_atx_case() {
        let build = build_of(vec![board("AM5", "DDR5", "ATX"), case("Micro-ATX", 0.0)]);
        let issues = validate(&build, 0.0);

        assert_eq!(rules(&issues), vec![CompatibilityRule::FormFactor]);
        assert_eq!(
            issues[0].to_string(),
            "Physical incompatibility: Board ATX will not fit in case Micro-ATX!"
        );
    }

    #[test]
    fn mini_itx_case_rejects_larger_boards() {
        for size in ["ATX", "Micro-ATX"] {
            let build = build_of(vec![board("AM5", "DDR5", size), case("Mini-ITX", 0.0)]);
            let issues = validate(&build, 0.0);
            assert_eq!(
                issues.iter().map(ToString::to_string).collect::<Vec<_>>(),
                vec!["The board is too big for this Mini-ITX case.".to_string()]
            );
        }
    }

    #[test]
    fn other_form_factor_pairs_pass() {
        for (case_size, board_size) in [
            ("ATX", "ATX"),
            ("ATX", "Micro-ATX"),
            ("Micro-ATX", "Micro-ATX"),
            ("Micro-ATX", "Mini-ITX"),
            ("Mini-ITX", "Mini-ITX"),
        ] {
            let build = build_of(vec![board("AM5", "DDR5", board_size), case(case_size, 0.0)]);
            assert!(validate(&build, 0.0).is_empty(), "{case_size}/{board_size}");
        }
    }

    #[test]
    fn long_gpu_reports_both_lengths() {
        let build = build_of(vec![gpu(336.0), case("ATX", 330.0)]);
        let issues = validate(&build, 0.0);

        assert_eq!(rules(&issues), vec![CompatibilityRule::GpuLength]);
        assert_eq!(
            issues[0].to_string(),
            "Physical: GPU is too long (336mm)! Case max: 330mm."
        );
    }

    #[test]
    fn gpu_length_check_needs_both_measurements() {
        let unmeasured = product_with(6, Category::Gpu, 300.0, json!({ "wattage": 115 }));
        let build = build_of(vec![unmeasured, case("ATX", 330.0)]);
        assert!(validate(&build, 0.0).is_empty());

        let build = build_of(vec![gpu(400.0), case("ATX", 0.0)]);
        assert!(validate(&build, 0.0).is_empty());
    }

    #[test]
    fn issues_follow_rule_order() {
        let build = build_of(vec![
            cpu("AM5"),
            board("LGA1700", "DDR5", "ATX"),
            ram("DDR4"),
            psu(100.0),
            case("Mini-ITX", 300.0),
            gpu(336.0),
        ]);
        let issues = validate(&build, total_wattage(&build));

        assert_eq!(
            rules(&issues),
            vec![
                CompatibilityRule::Socket,
                CompatibilityRule::MemoryType,
                CompatibilityRule::Power,
                CompatibilityRule::FormFactor,
                CompatibilityRule::GpuLength,
            ]
        );
        assert_eq!(validate_messages(&build, total_wattage(&build)).len(), 5);
    }

    #[test]
    fn compatible_products_filters_by_slot_and_rules() {
        let build = build_of(vec![board("AM5", "DDR5", "ATX")]);
        let mut intel = cpu("LGA1700");
        intel.id = ProductId::new(10).unwrap();
        let products = vec![cpu("AM5"), intel, ram("DDR5"), psu(100.0)];

        let cpus = compatible_products(&build, Category::Cpu, &products);
        assert_eq!(cpus.len(), 1);
        assert_eq!(cpus[0].specs.socket.as_deref(), Some("AM5"));

        // A weak PSU is still offered; power depends on the whole build.
        assert_eq!(compatible_products(&build, Category::Psu, &products).len(), 1);
    }

    #[test]
    fn unrelated_issues_do_not_hide_candidates() {
        let build = build_of(vec![board("AM5", "DDR5", "ATX"), ram("DDR4")]);
        let products = vec![cpu("AM5"), gpu(300.0)];

        assert_eq!(compatible_products(&build, Category::Cpu, &products).len(), 1);
        assert_eq!(compatible_products(&build, Category::Gpu, &products).len(), 1);
        assert!(compatible_products(&build, Category::Ram, &[ram("DDR4")]).is_empty());
    }
}
