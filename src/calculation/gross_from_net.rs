//! Net-to-gross search.
//!
//! Income tax brackets, deductions and allowance thresholds make the
//! gross-to-net function piecewise, so the inverse is found numerically: net
//! salary never decreases as gross grows, which allows a bounded bisection
//! over whole currency units.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::CountryRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{FamilyStatus, SalaryRequest, check_amount, max_amount};

use super::net_salary::compute_net;

/// Largest accepted distance between the target and the reached net.
pub const EPSILON: Decimal = Decimal::ONE;

/// Maximum number of net computations a single search may perform.
pub const MAX_ITERATIONS: u32 = 100;

/// The employee profile whose gross salary is searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetTarget {
    /// The monthly net salary to reach.
    pub target_net: Decimal,
    /// Marital status of the employee.
    pub family_status: FamilyStatus,
    /// Number of dependent children.
    pub children_count: u32,
    /// Monthly transport allowance.
    pub transport_bonus: Decimal,
    /// Monthly housing allowance.
    pub housing_bonus: Decimal,
}

impl NetTarget {
    /// Creates a target for a single employee without allowances.
    pub fn new(target_net: Decimal) -> Self {
        Self {
            target_net,
            family_status: FamilyStatus::Single,
            children_count: 0,
            transport_bonus: Decimal::ZERO,
            housing_bonus: Decimal::ZERO,
        }
    }

    fn validate(&self) -> EngineResult<()> {
        if self.target_net <= Decimal::ZERO {
            return Err(EngineError::validation(
                "targetNet",
                format!("must be positive (got {})", self.target_net),
            ));
        }
        check_amount("targetNet", self.target_net)?;
        check_amount("transportBonus", self.transport_bonus)?;
        check_amount("housingBonus", self.housing_bonus)?;
        Ok(())
    }
}

/// Bookkeeping for one search: counts evaluations against the budget.
struct Search<'a> {
    target: &'a NetTarget,
    rules: &'a CountryRules,
    request: SalaryRequest,
    iterations: u32,
}

impl<'a> Search<'a> {
    fn new(target: &'a NetTarget, rules: &'a CountryRules) -> Self {
        let request = SalaryRequest::new(Decimal::ZERO, rules.country)
            .with_family(target.family_status, target.children_count)
            .with_bonuses(target.transport_bonus, target.housing_bonus);
        Self {
            target,
            rules,
            request,
            iterations: 0,
        }
    }

    fn net_at(&mut self, gross: Decimal) -> EngineResult<Decimal> {
        if self.iterations >= MAX_ITERATIONS {
            return Err(self.failure("iteration budget exhausted"));
        }
        if gross > max_amount() {
            return Err(self.failure("gross salary exceeds the supported range"));
        }
        self.iterations += 1;
        self.request.gross_salary = gross;
        let net = compute_net(&self.request, self.rules)?.salaire_net;
        debug!(
            country = %self.rules.country,
            iteration = self.iterations,
            gross = %gross,
            net = %net,
            "Net-to-gross probe"
        );
        Ok(net)
    }

    fn failure(&self, message: &str) -> EngineError {
        warn!(
            country = %self.rules.country,
            target = %self.target.target_net,
            iterations = self.iterations,
            reason = message,
            "Net-to-gross search failed"
        );
        EngineError::Convergence {
            target: self.target.target_net,
            iterations: self.iterations,
            message: message.to_string(),
        }
    }
}

/// Finds the gross salary producing a target net salary.
///
/// The search returns the smallest whole gross salary whose net reaches the
/// target. An upper bound starts at `1.5 × target` and doubles until it
/// reaches the target; the interval is then bisected while keeping
/// `net(low) < target <= net(high)`. The result is verified before being
/// returned: its net lies within [`EPSILON`] of the target.
///
/// # Errors
///
/// - [`EngineError::Validation`] if the target is not positive or an amount is out of range
/// - [`EngineError::Convergence`] if net salary decreases between two probes, the
///   target is below the net of a zero gross, the budget of [`MAX_ITERATIONS`]
///   computations is exhausted, or the final net misses the target
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::{compute_gross_from_net, compute_net, NetTarget};
/// use paye_engine::config::ConfigLoader;
/// use paye_engine::models::{Country, SalaryRequest};
/// use rust_decimal::Decimal;
///
/// let book = ConfigLoader::builtin().unwrap().into_rule_book();
/// let rules = book.latest(Country::Benin).unwrap();
///
/// let gross = compute_gross_from_net(&NetTarget::new(Decimal::from(250_000)), rules).unwrap();
/// let net = compute_net(&SalaryRequest::new(gross, Country::Benin), rules)
///     .unwrap()
///     .salaire_net;
/// assert!((net - Decimal::from(250_000)).abs() < Decimal::ONE);
/// ```
pub fn compute_gross_from_net(target: &NetTarget, rules: &CountryRules) -> EngineResult<Decimal> {
    target.validate()?;
    let goal = target.target_net;
    let mut search = Search::new(target, rules);

    let mut low = Decimal::ZERO;
    let mut net_low = search.net_at(low)?;
    if net_low >= goal {
        if net_low - goal < EPSILON {
            return Ok(low);
        }
        return Err(search.failure("target net is below the net paid on a zero gross salary"));
    }

    let mut high = (goal * Decimal::new(15, 1)).ceil();
    let mut net_high = search.net_at(high)?;
    while net_high < goal {
        if net_high < net_low {
            return Err(search.failure("net salary decreased while gross increased"));
        }
        low = high;
        net_low = net_high;
        high = high
            .checked_mul(Decimal::TWO)
            .ok_or_else(|| search.failure("gross salary search overflowed"))?;
        net_high = search.net_at(high)?;
    }

    while high - low > Decimal::ONE {
        let mid = ((low + high) / Decimal::TWO).floor();
        let net_mid = search.net_at(mid)?;
        if net_mid < net_low || net_mid > net_high {
            return Err(search.failure("net salary is not monotonic in gross salary"));
        }
        if net_mid < goal {
            low = mid;
            net_low = net_mid;
        } else {
            high = mid;
            net_high = net_mid;
        }
    }

    if (net_high - goal).abs() >= EPSILON {
        return Err(search.failure(&format!(
            "closest gross {} yields net {}",
            high, net_high
        )));
    }

    debug!(
        country = %rules.country,
        target = %goal,
        gross = %high,
        iterations = search.iterations,
        "Net-to-gross search converged"
    );
    Ok(high)
}
