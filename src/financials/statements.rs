//! Annual income statement, cash flow statement and balance sheet

use serde::{Deserialize, Serialize};

/// One month's share of an annual figure (AR and AP are one month of flow)
pub const ONE_MONTH_FRACTION: f64 = 0.0833;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatementParams {
    /// Depreciation as a share of revenue
    pub depreciation_rate: f64,
    pub tax_rate: f64,
    pub interest_expense: f64,
}

impl Default for IncomeStatementParams {
    fn default() -> Self {
        Self {
            depreciation_rate: 0.10,
            tax_rate: 0.21,
            interest_expense: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub year: u32,
    pub revenue: f64,
    pub cogs: f64,
    pub gross_profit: f64,
    pub opex: f64,
    pub ebitda: f64,
    pub depreciation: f64,
    pub ebit: f64,
    pub interest_expense: f64,
    pub ebt: f64,
    pub taxes: f64,
    pub net_income: f64,
}

/// Build the income statement for a year
///
/// Taxes apply to positive EBT only; losses carry no tax benefit.
pub fn calculate_income_statement(
    year: u32,
    revenue: f64,
    cogs: f64,
    opex: f64,
    params: &IncomeStatementParams,
) -> IncomeStatement {
    let gross_profit = revenue - cogs;
    let ebitda = gross_profit - opex;
    let depreciation = revenue * params.depreciation_rate;
    let ebit = ebitda - depreciation;
    let ebt = ebit - params.interest_expense;
    let taxes = ebt.max(0.0) * params.tax_rate;
    let net_income = ebt - taxes;

    IncomeStatement {
        year,
        revenue,
        cogs,
        gross_profit,
        opex,
        ebitda,
        depreciation,
        ebit,
        interest_expense: params.interest_expense,
        ebt,
        taxes,
        net_income,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowParams {
    /// Capital expenditure as a share of revenue
    pub capex_rate: f64,
    pub debt_proceeds: f64,
    pub equity_proceeds: f64,
}

impl Default for CashFlowParams {
    fn default() -> Self {
        Self {
            capex_rate: 0.05,
            debt_proceeds: 0.0,
            equity_proceeds: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub year: u32,
    pub net_income: f64,
    pub depreciation: f64,
    pub operating_cash_flow: f64,
    /// Negative (cash out)
    pub capex: f64,
    pub investing_cash_flow: f64,
    pub debt_proceeds: f64,
    pub equity_proceeds: f64,
    pub financing_cash_flow: f64,
    pub net_cash_flow: f64,
    pub beginning_cash: f64,
    pub cash_balance: f64,
}

/// Derive the cash flow statement from the income statement
pub fn calculate_cash_flow(
    year: u32,
    income: &IncomeStatement,
    previous_cash_balance: f64,
    params: &CashFlowParams,
) -> CashFlowStatement {
    // Depreciation is non-cash
    let operating_cash_flow = income.net_income + income.depreciation;
    let capex = -income.revenue * params.capex_rate;
    let investing_cash_flow = capex;
    let financing_cash_flow = params.debt_proceeds + params.equity_proceeds;
    let net_cash_flow = operating_cash_flow + investing_cash_flow + financing_cash_flow;

    CashFlowStatement {
        year,
        net_income: income.net_income,
        depreciation: income.depreciation,
        operating_cash_flow,
        capex,
        investing_cash_flow,
        debt_proceeds: params.debt_proceeds,
        equity_proceeds: params.equity_proceeds,
        financing_cash_flow,
        net_cash_flow,
        beginning_cash: previous_cash_balance,
        cash_balance: previous_cash_balance + net_cash_flow,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub year: u32,
    pub cash: f64,
    pub accounts_receivable: f64,
    pub total_assets: f64,
    pub accounts_payable: f64,
    pub total_liabilities: f64,
    /// Assets less liabilities; never tracked independently
    pub equity: f64,
    pub paid_in_capital: f64,
    /// Equity less paid-in capital
    pub retained_earnings: f64,
}

impl BalanceSheet {
    /// Whether assets equal liabilities plus equity
    pub fn is_balanced(&self) -> bool {
        let tolerance = 1e-9 * self.total_assets.abs().max(1.0);
        (self.total_assets - (self.total_liabilities + self.equity)).abs() <= tolerance
    }
}

/// Build the balance sheet, with equity as the balancing figure
pub fn calculate_balance_sheet(
    year: u32,
    cash_balance: f64,
    revenue: f64,
    opex: f64,
    paid_in_capital: f64,
) -> BalanceSheet {
    let accounts_receivable = revenue * ONE_MONTH_FRACTION;
    let accounts_payable = opex * ONE_MONTH_FRACTION;
    let total_assets = cash_balance + accounts_receivable;
    let total_liabilities = accounts_payable;
    let equity = total_assets - total_liabilities;

    BalanceSheet {
        year,
        cash: cash_balance,
        accounts_receivable,
        total_assets,
        accounts_payable,
        total_liabilities,
        equity,
        paid_in_capital,
        retained_earnings: equity - paid_in_capital,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_profitable_income_statement() {
        let is = calculate_income_statement(3, 1_000_000.0, 200_000.0, 500_000.0, &IncomeStatementParams::default());

        assert_relative_eq!(is.gross_profit, 800_000.0);
        assert_relative_eq!(is.ebitda, 300_000.0);
        assert_relative_eq!(is.depreciation, 100_000.0);
        assert_relative_eq!(is.ebit, 200_000.0);
        assert_relative_eq!(is.taxes, 42_000.0, epsilon = 1e-6);
        assert_relative_eq!(is.net_income, 158_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_losses_not_tax_benefited() {
        let is = calculate_income_statement(1, 100_000.0, 25_000.0, 900_000.0, &IncomeStatementParams::default());

        assert!(is.ebt < 0.0);
        assert_eq!(is.taxes, 0.0);
        assert_eq!(is.net_income, is.ebt);
    }

    #[test]
    fn test_interest_expense() {
        let params = IncomeStatementParams {
            interest_expense: 50_000.0,
            ..Default::default()
        };
        let is = calculate_income_statement(1, 1_000_000.0, 0.0, 0.0, &params);

        assert_relative_eq!(is.ebt, is.ebit - 50_000.0);
    }

    #[test]
    fn test_cash_flow_adds_back_depreciation() {
        let is = calculate_income_statement(2, 1_000_000.0, 200_000.0, 500_000.0, &IncomeStatementParams::default());
        let params = CashFlowParams {
            equity_proceeds: 2_000_000.0,
            debt_proceeds: 500_000.0,
            ..Default::default()
        };
        let cf = calculate_cash_flow(2, &is, 1_000_000.0, &params);

        assert_relative_eq!(cf.operating_cash_flow, is.net_income + is.depreciation);
        assert_relative_eq!(cf.capex, -50_000.0);
        assert_relative_eq!(cf.financing_cash_flow, 2_500_000.0);
        assert_relative_eq!(
            cf.cash_balance,
            1_000_000.0 + cf.operating_cash_flow + cf.investing_cash_flow + cf.financing_cash_flow,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_balance_sheet_balances() {
        let bs = calculate_balance_sheet(4, 3_250_000.0, 12_000_000.0, 9_000_000.0, 10_000_000.0);

        assert_relative_eq!(bs.accounts_receivable, 12_000_000.0 * 0.0833);
        assert_relative_eq!(bs.accounts_payable, 9_000_000.0 * 0.0833);
        assert!(bs.is_balanced());
        assert_relative_eq!(bs.retained_earnings, bs.equity - 10_000_000.0);
    }

    #[test]
    fn test_negative_cash_still_balances() {
        let bs = calculate_balance_sheet(1, -750_000.0, 0.0, 1_200_000.0, 0.0);

        assert!(bs.equity < 0.0);
        assert!(bs.is_balanced());
    }
}
