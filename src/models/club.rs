// src/models/club.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// Dados institucionais do clube (um registro por dono).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClubData {
    #[serde(skip_serializing)]
    pub user_id: Uuid,

    pub name: String,
    pub founded: Option<i32>,
    pub stadium: Option<String>,
    pub capacity: Option<i32>,

    // Contato
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,

    pub budget: Option<i64>,
    pub trophies: i32,

    // Equipe técnica
    pub coaching_staff: i32,
    pub medical_staff: i32,

    // Estrutura
    pub has_training_ground: bool,
    pub has_academy: bool,
    pub has_medical_center: bool,

    pub sponsor_name: Option<String>,
    pub sponsor_value: Option<i64>,

    pub notes: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ClubData {
    /// Placeholder devolvido enquanto o dono ainda não salvou nada.
    pub fn placeholder(user_id: Uuid) -> Self {
        Self {
            user_id,
            name: "My Club".to_string(),
            founded: None,
            stadium: None,
            capacity: None,
            address: None,
            phone: None,
            email: None,
            website: None,
            budget: None,
            trophies: 0,
            coaching_staff: 0,
            medical_staff: 0,
            has_training_ground: false,
            has_academy: false,
            has_medical_center: false,
            sponsor_name: None,
            sponsor_value: None,
            notes: None,
            updated_at: None,
        }
    }
}

// Escrita "inteira": o registro salvo é substituído por este.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClubDataInput {
    #[validate(length(min = 1, max = 120, message = "Club name is required."))]
    pub name: String,
    #[validate(range(min = 1800, max = 2100))]
    pub founded: Option<i32>,
    pub stadium: Option<String>,
    #[validate(range(min = 0))]
    pub capacity: Option<i32>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub website: Option<String>,
    #[validate(range(min = 0))]
    pub budget: Option<i64>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub trophies: i32,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub coaching_staff: i32,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub medical_staff: i32,
    #[serde(default)]
    pub has_training_ground: bool,
    #[serde(default)]
    pub has_academy: bool,
    #[serde(default)]
    pub has_medical_center: bool,
    pub sponsor_name: Option<String>,
    #[validate(range(min = 0))]
    pub sponsor_value: Option<i64>,
    pub notes: Option<String>,
}
