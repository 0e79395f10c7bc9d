// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::period::Period;

/// Largest amount a single expense or income record may carry.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    EWallet,
    BankTransfer,
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::EWallet,
        PaymentMethod::BankTransfer,
        PaymentMethod::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::EWallet => "e_wallet",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::EWallet => "E-Wallet",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Other => "Other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidData(format!("Unknown payment method '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurringFrequency {
    Weekly,
    Monthly,
    Yearly,
}

impl RecurringFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringFrequency::Weekly => "weekly",
            RecurringFrequency::Monthly => "monthly",
            RecurringFrequency::Yearly => "yearly",
        }
    }
}

impl FromStr for RecurringFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(RecurringFrequency::Weekly),
            "monthly" => Ok(RecurringFrequency::Monthly),
            "yearly" => Ok(RecurringFrequency::Yearly),
            _ => Err(Error::InvalidData(format!(
                "Unknown recurring frequency '{}'",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub item: String,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub category: Option<Category>,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub is_recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub source: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRollup {
    pub category_id: String,
    pub category_name: String,
    pub category_color: String,
    pub category_icon: String,
    pub total: Decimal,
    pub percentage: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodRollup {
    pub method: PaymentMethod,
    pub total: Decimal,
    pub percentage: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub month: u32,
    pub year: i32,
    pub total_expenses: Decimal,
    pub total_income: Decimal,
    pub savings: Decimal,
    pub savings_rate: Decimal,
    pub by_category: Vec<CategoryRollup>,
    pub by_payment_method: Vec<PaymentMethodRollup>,
    pub biggest_expense: Option<Expense>,
    pub daily_average: Decimal,
    pub comparison_to_last_month: Decimal,
    pub advice: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    #[serde(skip)]
    pub period: Period,
    pub period_label: String,
    pub total_expenses: Decimal,
    pub total_income: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Report,
    Reminder,
    Alert,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Report => "report",
            NotificationKind::Reminder => "reminder",
            NotificationKind::Alert => "alert",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "report" => Ok(NotificationKind::Report),
            "reminder" => Ok(NotificationKind::Reminder),
            "alert" => Ok(NotificationKind::Alert),
            _ => Err(Error::InvalidData(format!("Unknown notification type '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    pub data: Option<serde_json::Value>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub data: Option<serde_json::Value>,
}
