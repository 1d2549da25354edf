use serde::{Deserialize, Serialize};

use super::{BookId, ValidationError};

/// フォームの数値入力
///
/// JSONの数値でも文字列でも受け付ける。数値として解釈できない文字列は0になり、
/// その後の正値チェックで弾かれる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormNumber {
    Number(f64),
    Text(String),
}

impl FormNumber {
    pub fn as_f64(&self) -> f64 {
        match self {
            FormNumber::Number(n) => *n,
            FormNumber::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0),
        }
    }

    /// 整数として解釈する（小数部は切り捨て）
    pub fn as_i64(&self) -> i64 {
        match self {
            FormNumber::Number(n) => n.trunc() as i64,
            FormNumber::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| n.trunc() as i64))
                    .unwrap_or(0)
            }
        }
    }
}

impl From<f64> for FormNumber {
    fn from(value: f64) -> Self {
        FormNumber::Number(value)
    }
}

impl From<&str> for FormNumber {
    fn from(value: &str) -> Self {
        FormNumber::Text(value.to_string())
    }
}

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

fn positive_quantity(field: &'static str, value: &FormNumber) -> Result<i64, ValidationError> {
    let n = value.as_i64();
    if n <= 0 {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(n)
}

fn positive_amount(field: &'static str, value: &FormNumber) -> Result<f64, ValidationError> {
    let n = value.as_f64();
    if n <= 0.0 {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(n)
}

/// 検証済みの書籍入力
#[derive(Debug, Clone, PartialEq)]
pub struct BookInput {
    pub name: String,
    pub quantity: i64,
    pub price_per_unit: f64,
}

/// コマンド：書籍を登録する
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBook {
    pub name: String,
    pub quantity: FormNumber,
    pub price_per_unit: FormNumber,
}

impl AddBook {
    pub fn validate(&self) -> Result<BookInput, ValidationError> {
        required("name", &self.name)?;
        Ok(BookInput {
            name: self.name.clone(),
            quantity: positive_quantity("quantity", &self.quantity)?,
            price_per_unit: positive_amount("pricePerUnit", &self.price_per_unit)?,
        })
    }
}

/// コマンド：書籍を編集する
///
/// 編集画面は値を検証しない。数値でない入力は0になり、そのまま保存される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    pub name: String,
    pub quantity: FormNumber,
    pub price_per_unit: FormNumber,
}

impl UpdateBook {
    pub fn to_input(&self) -> BookInput {
        BookInput {
            name: self.name.clone(),
            quantity: self.quantity.as_i64(),
            price_per_unit: self.price_per_unit.as_f64(),
        }
    }
}

/// 検証済みの販売入力
#[derive(Debug, Clone, PartialEq)]
pub struct SaleInput {
    pub customer_name: String,
    pub book_id: BookId,
    pub quantity: i64,
    pub selling_price: f64,
}

/// コマンド：販売を登録する
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSale {
    pub customer_name: String,
    pub book_id: Option<BookId>,
    pub quantity: FormNumber,
    pub selling_price: FormNumber,
}

impl RecordSale {
    pub fn validate(&self) -> Result<SaleInput, ValidationError> {
        required("customerName", &self.customer_name)?;
        let book_id = self
            .book_id
            .clone()
            .filter(|id| !id.as_str().trim().is_empty())
            .ok_or(ValidationError::Required { field: "bookId" })?;
        Ok(SaleInput {
            customer_name: self.customer_name.clone(),
            book_id,
            quantity: positive_quantity("quantity", &self.quantity)?,
            selling_price: self.selling_price.as_f64(),
        })
    }
}

/// コマンド：未完了の販売を編集する
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSale {
    pub customer_name: String,
    pub quantity: FormNumber,
    pub selling_price: FormNumber,
}

impl EditSale {
    pub fn validate(&self) -> Result<(String, i64, f64), ValidationError> {
        required("customerName", &self.customer_name)?;
        Ok((
            self.customer_name.clone(),
            positive_quantity("quantity", &self.quantity)?,
            self.selling_price.as_f64(),
        ))
    }
}

/// コマンド：書籍の在庫を減らす
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecrementStock {
    pub amount: FormNumber,
}

impl DecrementStock {
    pub fn validate(&self) -> Result<i64, ValidationError> {
        positive_quantity("amount", &self.amount)
    }
}
