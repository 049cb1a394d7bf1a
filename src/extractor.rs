//! Builds a [`CreditReportAggregate`] from a decoded bureau document.
//!
//! One linear pass over the tree:
//! 1. Check the root envelope and the four root branches
//! 2. Normalize the account records into a sequence
//! 3. Extract each account, then the applicant, score and summaries
//!
//! Leaf-level absence is defaulted by the collaborators. Container-shape
//! faults are wrapped here, once, with the full path of the offending node.

use crate::address;
use crate::coercion;
use crate::errors::{ExtractionError, ReportError};
use crate::models::{AccountRecord, CreditReportAggregate, PersonalInfo, SummaryDetails};
use crate::normalizer;
use crate::tree::{self, ShapeError};
use crate::xml_tree;
use serde_json::Value;

/// Bureau document paths, relative to their enclosing branch.
pub mod paths {
    pub const ROOT_ENVELOPE: &str = "INProfileResponse";

    pub const APPLICANT: &str =
        "Current_Application.Current_Application_Details.Current_Applicant_Details";
    pub const SCORE: &str = "SCORE";
    pub const ACCOUNTS_SUMMARY: &str = "CAIS_Account.CAIS_Summary";
    pub const ACCOUNT_DETAILS: &str = "CAIS_Account.CAIS_Account_DETAILS";
    pub const ENQUIRIES_SUMMARY: &str = "TotalCAPS_Summary";

    pub const FIRST_NAME: &str = "First_Name";
    pub const LAST_NAME: &str = "Last_Name";
    pub const MOBILE_PHONE: &str = "MobilePhoneNumber";
    pub const BUREAU_SCORE: &str = "BureauScore";

    pub const CREDIT_ACCOUNT: &str = "Credit_Account";
    pub const ACCOUNT_TOTAL: &str = "CreditAccountTotal";
    pub const ACCOUNT_ACTIVE: &str = "CreditAccountActive";
    pub const ACCOUNT_CLOSED: &str = "CreditAccountClosed";
    pub const OUTSTANDING_BALANCE: &str = "Total_Outstanding_Balance";
    pub const BALANCE_ALL: &str = "Outstanding_Balance_All";
    pub const BALANCE_SECURED: &str = "Outstanding_Balance_Secured";
    pub const BALANCE_UNSECURED: &str = "Outstanding_Balance_UnSecured";
    pub const ENQUIRIES_LAST_7_DAYS: &str = "TotalCAPSLast7Days";

    pub const ACCOUNT_NUMBER: &str = "Account_Number";
    pub const SUBSCRIBER_NAME: &str = "Subscriber_Name";
    pub const CURRENT_BALANCE: &str = "Current_Balance";
    pub const AMOUNT_PAST_DUE: &str = "Amount_Past_Due";
    pub const HOLDER_ADDRESS: &str = "CAIS_Holder_Address_Details";
    pub const HOLDER_DETAILS: &str = "CAIS_Holder_Details";
    pub const HOLDER_PAN: &str = "Income_TAX_PAN";
}

static ABSENT: Value = Value::Null;

/// A node together with its path from the document root.
#[derive(Clone, Copy)]
struct Scope<'a> {
    node: &'a Value,
    path: &'a str,
}

impl<'a> Scope<'a> {
    fn new(node: &'a Value, path: &'a str) -> Self {
        Self { node, path }
    }

    fn failed(&self, relative: &str, err: ShapeError) -> ExtractionError {
        ExtractionError::ExtractionFailed {
            path: tree::join_path(self.path, relative),
            reason: err.to_string(),
        }
    }

    fn text(&self, leaf: &str) -> Result<String, ExtractionError> {
        tree::resolve_text(self.node, leaf).map_err(|e| self.failed(leaf, e))
    }

    fn number(&self, leaf: &str) -> Result<f64, ExtractionError> {
        coercion::coerce_number(tree::resolve(self.node, leaf)).map_err(|e| self.failed(leaf, e))
    }

    fn integer(&self, leaf: &str) -> Result<i64, ExtractionError> {
        coercion::coerce_integer(tree::resolve(self.node, leaf)).map_err(|e| self.failed(leaf, e))
    }

    /// Optional sub-branch; absent yields an empty node so its leaves default.
    fn branch(&self, relative: &str) -> Result<&'a Value, ExtractionError> {
        match tree::optional_object(self.node, relative) {
            Ok(Some(_)) => Ok(tree::resolve_or(self.node, relative, &ABSENT)),
            Ok(None) => Ok(&ABSENT),
            Err(e) => Err(self.failed(relative, e)),
        }
    }

    /// One of the root branches: a non-container here means the document
    /// is not of the expected family.
    fn root_branch(&self, relative: &str) -> Result<&'a Value, ExtractionError> {
        self.branch(relative).map_err(|err| match err {
            ExtractionError::ExtractionFailed { path, reason } => {
                ExtractionError::SchemaMismatch(format!("`{}`: {}", path, reason))
            }
            other => other,
        })
    }

    /// First non-blank occurrence of a repeatable sub-branch, which must be
    /// a mapping.
    fn first_mapping(&self, relative: &str) -> Result<Option<&'a Value>, ExtractionError> {
        match normalizer::first_at(self.node, relative) {
            None => Ok(None),
            Some(found) if found.is_object() => Ok(Some(found)),
            Some(other) => Err(self.failed(
                relative,
                ShapeError::NotAMapping {
                    found: tree::kind_of(other),
                },
            )),
        }
    }
}

/// Decodes an uploaded XML document and extracts its aggregate.
pub fn parse_credit_report(xml: &[u8]) -> Result<CreditReportAggregate, ReportError> {
    let document = xml_tree::decode(xml)?;
    Ok(extract(&document)?)
}

/// Extracts the aggregate from a decoded document tree.
///
/// Fails with [`ExtractionError::SchemaMismatch`] when the root envelope is
/// missing or a root branch has the wrong container kind, and with
/// [`ExtractionError::ExtractionFailed`] when a container sits where a leaf
/// was expected. Missing leaves never fail.
pub fn extract(document: &Value) -> Result<CreditReportAggregate, ExtractionError> {
    let envelope = match tree::require_object(document, paths::ROOT_ENVELOPE) {
        Ok(_) => tree::resolve_or(document, paths::ROOT_ENVELOPE, &ABSENT),
        // `<INProfileResponse/>` decodes to blank text: an envelope with no branches.
        Err(_)
            if tree::resolve(document, paths::ROOT_ENVELOPE).is_some_and(normalizer::is_blank) =>
        {
            &ABSENT
        }
        Err(_) => {
            return Err(ExtractionError::SchemaMismatch(
                "missing root envelope".to_string(),
            ))
        }
    };
    let response = Scope::new(envelope, paths::ROOT_ENVELOPE);

    let applicant_path = tree::join_path(response.path, paths::APPLICANT);
    let applicant = Scope::new(response.root_branch(paths::APPLICANT)?, &applicant_path);
    let score_path = tree::join_path(response.path, paths::SCORE);
    let score = Scope::new(response.root_branch(paths::SCORE)?, &score_path);
    let summary_path = tree::join_path(response.path, paths::ACCOUNTS_SUMMARY);
    let summary = Scope::new(response.root_branch(paths::ACCOUNTS_SUMMARY)?, &summary_path);

    let accounts_path = tree::join_path(response.path, paths::ACCOUNT_DETAILS);
    let account_nodes = normalizer::sequence_at(envelope, paths::ACCOUNT_DETAILS);
    let mut accounts_list = Vec::with_capacity(account_nodes.len());
    for (index, node) in account_nodes.iter().enumerate() {
        let path = format!("{}[{}]", accounts_path, index);
        accounts_list.push(extract_account(node, &path)?);
    }

    let pan_number = report_pan(&account_nodes, &accounts_path)?;

    let personal_info = PersonalInfo {
        full_name: full_name(
            &applicant.text(paths::FIRST_NAME)?,
            &applicant.text(paths::LAST_NAME)?,
        ),
        phone_number: applicant.text(paths::MOBILE_PHONE)?,
        pan_number,
        credit_score: score.integer(paths::BUREAU_SCORE)?,
    };

    let summary_details = extract_summary(&response, &summary)?;

    tracing::debug!(
        "Extracted credit report: {} accounts, score {}",
        accounts_list.len(),
        personal_info.credit_score
    );

    Ok(CreditReportAggregate {
        personal_info,
        summary_details,
        accounts_list,
    })
}

/// Extracts one account record; `path` locates the node for diagnostics.
///
/// An empty account element yields an all-default record.
pub fn extract_account(node: &Value, path: &str) -> Result<AccountRecord, ExtractionError> {
    if normalizer::is_blank(node) {
        return Ok(AccountRecord::default());
    }
    if !node.is_object() {
        return Err(ExtractionError::ExtractionFailed {
            path: path.to_string(),
            reason: ShapeError::NotAMapping {
                found: tree::kind_of(node),
            }
            .to_string(),
        });
    }
    let account = Scope::new(node, path);

    let address_node = account.first_mapping(paths::HOLDER_ADDRESS)?;
    let address = address::holder_address(address_node).map_err(|(line, e)| {
        account.failed(&tree::join_path(paths::HOLDER_ADDRESS, line), e)
    })?;

    Ok(AccountRecord {
        account_number: account.text(paths::ACCOUNT_NUMBER)?,
        bank_name: account.text(paths::SUBSCRIBER_NAME)?,
        current_balance: account.number(paths::CURRENT_BALANCE)?,
        overdue_amount: account.number(paths::AMOUNT_PAST_DUE)?,
        address,
    })
}

/// Joins name parts with single spaces, dropping blank parts.
pub fn full_name(first: &str, last: &str) -> String {
    first
        .split_whitespace()
        .chain(last.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_summary(
    response: &Scope<'_>,
    summary: &Scope<'_>,
) -> Result<SummaryDetails, ExtractionError> {
    let credit_path = tree::join_path(summary.path, paths::CREDIT_ACCOUNT);
    let credit = Scope::new(summary.branch(paths::CREDIT_ACCOUNT)?, &credit_path);
    let balance_path = tree::join_path(summary.path, paths::OUTSTANDING_BALANCE);
    let balance = Scope::new(summary.branch(paths::OUTSTANDING_BALANCE)?, &balance_path);
    let enquiries_path = tree::join_path(response.path, paths::ENQUIRIES_SUMMARY);
    let enquiries = Scope::new(response.branch(paths::ENQUIRIES_SUMMARY)?, &enquiries_path);

    Ok(SummaryDetails {
        total_accounts: credit.integer(paths::ACCOUNT_TOTAL)?,
        active_accounts: credit.integer(paths::ACCOUNT_ACTIVE)?,
        closed_accounts: credit.integer(paths::ACCOUNT_CLOSED)?,
        total_balance: balance.number(paths::BALANCE_ALL)?,
        secured_amount: balance.number(paths::BALANCE_SECURED)?,
        unsecured_amount: balance.number(paths::BALANCE_UNSECURED)?,
        recent_enquiries: enquiries.integer(paths::ENQUIRIES_LAST_7_DAYS)?,
    })
}

fn account_pan(node: &Value, path: &str) -> Result<String, ExtractionError> {
    let account = Scope::new(node, path);
    let holder_path = tree::join_path(path, paths::HOLDER_DETAILS);
    match account.first_mapping(paths::HOLDER_DETAILS)? {
        Some(holder) => Scope::new(holder, &holder_path).text(paths::HOLDER_PAN),
        None => Ok(String::new()),
    }
}

/// PAN of the first account's holder. The bureau reports PAN per applicant,
/// so later accounts are only compared against it.
fn report_pan(account_nodes: &[&Value], accounts_path: &str) -> Result<String, ExtractionError> {
    let Some(first) = account_nodes.first() else {
        return Ok(String::new());
    };
    let pan = account_pan(first, &format!("{}[0]", accounts_path))?;

    for (index, node) in account_nodes.iter().enumerate().skip(1) {
        if let Ok(other) = account_pan(node, &format!("{}[{}]", accounts_path, index)) {
            if !other.is_empty() && !pan.is_empty() && other != pan {
                tracing::warn!(
                    "Account {} reports a different holder PAN than the first account; keeping the first",
                    index
                );
            }
        }
    }

    Ok(pan)
}
