use serde::{Deserialize, Deserializer, Serialize};

use super::imaging::ImagingFinding;

/// Flat record of collected answers.
///
/// Every field is optional so partially completed questionnaires deserialize;
/// unanswered items simply contribute nothing. Categorical answers stay plain
/// strings and are matched against the weight table's variant keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Questionnaire {
    pub patient_id: Option<String>,
    #[serde(deserialize_with = "whole_years")]
    pub age: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub bmi: Option<f64>,
    pub gender: Option<String>,
    pub affected_side: Option<String>,
    pub duration: Option<String>,

    #[serde(rename = "kneeOA", deserialize_with = "null_as_default")]
    pub knee_oa: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub patellar_dislocation: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub meniscus_ligament: bool,
    pub sports_activity: Option<String>,
    pub knee_history: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub pain_location: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub provocative_movements: Vec<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub rest_pain: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub night_pain: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub fever: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub severe_swelling: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub catching_clicking: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub locking: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub instability: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub local_swelling: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub local_heat: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub joint_effusion: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub burning_tingling: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub numbness: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub other_symptom: bool,

    pub tibial_tenderness: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub joint_line_tenderness: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub patellar_facet_tenderness: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub plica_palpation: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub tibial_nodule: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub hoffa_tenderness: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub infrapatellar_branch_tenderness: bool,

    pub valgus_stress: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub squat_pain: bool,
    pub clarke_test: Option<String>,
    pub patellar_tilt: Option<String>,
    pub apprehension: Option<String>,
    pub mpp_test: Option<String>,
    pub stutter_test: Option<String>,
    pub hoffa_test: Option<String>,
    pub mc_murray_test: Option<String>,
    pub apley_test: Option<String>,
    pub thessaly_test: Option<String>,
    pub tinel_sign: Option<String>,

    #[serde(rename = "xrayOA", deserialize_with = "null_as_default")]
    pub xray_oa: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub xray_pes_spurs: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub xray_patellar: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub us_pes_bursa: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub us_plica: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub us_patellar_tendon: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub us_hoffa: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub us_meniscus: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub us_saphenous: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub mri_pes: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub mri_plica: bool,
    #[serde(rename = "mriPF", deserialize_with = "null_as_default")]
    pub mri_pf: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub mri_hoffa: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub mri_meniscus: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub mri_saphenous: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub mri_meniscus_ligament: bool,
}

impl Questionnaire {
    /// Explicit BMI when given, otherwise derived from height and weight.
    pub fn body_mass_index(&self) -> Option<f64> {
        if let Some(bmi) = self.bmi.filter(|bmi| bmi.is_finite()) {
            return Some(bmi);
        }
        match (self.height_cm, self.weight_kg) {
            (Some(height), Some(weight)) if height > 0.0 && weight > 0.0 => {
                Some(weight * 10_000.0 / (height * height))
            }
            _ => None,
        }
    }

    pub fn patient_label(&self) -> String {
        self.patient_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or("anonymous")
            .to_string()
    }

    pub fn imaging_findings(&self) -> Vec<ImagingFinding> {
        ImagingFinding::ALL
            .into_iter()
            .filter(|finding| self.has_finding(*finding))
            .collect()
    }

    pub fn has_finding(&self, finding: ImagingFinding) -> bool {
        match finding {
            ImagingFinding::XrayOa => self.xray_oa,
            ImagingFinding::XrayPesSpurs => self.xray_pes_spurs,
            ImagingFinding::XrayPatellar => self.xray_patellar,
            ImagingFinding::UsPesBursa => self.us_pes_bursa,
            ImagingFinding::UsPlica => self.us_plica,
            ImagingFinding::UsPatellarTendon => self.us_patellar_tendon,
            ImagingFinding::UsHoffa => self.us_hoffa,
            ImagingFinding::UsMeniscus => self.us_meniscus,
            ImagingFinding::UsSaphenous => self.us_saphenous,
            ImagingFinding::MriPes => self.mri_pes,
            ImagingFinding::MriPlica => self.mri_plica,
            ImagingFinding::MriPf => self.mri_pf,
            ImagingFinding::MriHoffa => self.mri_hoffa,
            ImagingFinding::MriMeniscus => self.mri_meniscus,
            ImagingFinding::MriSaphenous => self.mri_saphenous,
            ImagingFinding::MriMeniscusLigament => self.mri_meniscus_ligament,
        }
    }
}

/// Explicit `null` reads the same as an unanswered item.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let opt = Option::<T>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Accepts any JSON number and truncates it; negative or non-finite ages are dropped.
fn whole_years<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<f64>::deserialize(deserializer)?;
    Ok(opt
        .filter(|age| age.is_finite() && *age >= 0.0)
        .map(|age| age.trunc().min(f64::from(u32::MAX)) as u32))
}
