use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::diagnosis::Diagnosis;
use super::finalize;
use super::imaging::ImagingRoute;
use super::questionnaire::Questionnaire;
use super::result::{ContributingFactor, RedFlag, ScoringResult};
use super::weights::{ScoringConfig, WeightCategory, WeightEntry};

/// Ages below this bound fall in the `young` bracket.
pub const YOUNG_AGE_LIMIT: u32 = 31;
/// Ages below this bound (and not young) fall in the `middle` bracket.
pub const MIDDLE_AGE_LIMIT: u32 = 51;
pub const HIGH_BMI_THRESHOLD: f64 = 25.0;

const RED_FLAG_SYMPTOMS: [&str; 4] = ["restPain", "nightPain", "fever", "severeSwelling"];

pub fn age_bracket(age: u32) -> &'static str {
    if age < YOUNG_AGE_LIMIT {
        "young"
    } else if age < MIDDLE_AGE_LIMIT {
        "middle"
    } else {
        "senior"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnginePhase {
    Idle,
    Accumulating,
}

/// Mutable per-case accumulation. Discarded or overwritten by `reset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulatorState {
    pub scores: BTreeMap<Diagnosis, i32>,
    pub factors: Vec<ContributingFactor>,
    pub red_flags: Vec<RedFlag>,
}

impl Default for AccumulatorState {
    fn default() -> Self {
        Self {
            scores: Diagnosis::ALL.into_iter().map(|tag| (tag, 0)).collect(),
            factors: Vec::new(),
            red_flags: Vec::new(),
        }
    }
}

/// Diagnoses a weight entry may move, and which of those skip factor recording.
#[derive(Debug, Clone, Copy)]
struct Reach<'r> {
    affects: &'r [Diagnosis],
    score_only: &'r [Diagnosis],
}

impl Reach<'static> {
    const EVERY_TAG: Reach<'static> = Reach {
        affects: &Diagnosis::ALL,
        score_only: &[],
    };
}

/// Single-case accumulator over a shared weight table.
///
/// One instance scores one case at a time; concurrent cases need one engine
/// each. The table itself is only ever borrowed.
pub struct ScoringEngine<'a> {
    config: &'a ScoringConfig,
    state: AccumulatorState,
    phase: EnginePhase,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self {
            config,
            state: AccumulatorState::default(),
            phase: EnginePhase::Idle,
        }
    }

    pub fn config(&self) -> &'a ScoringConfig {
        self.config
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn state(&self) -> &AccumulatorState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = AccumulatorState::default();
        self.phase = EnginePhase::Idle;
    }

    /// Runs a whole case: reset, the four passes, then finalize.
    pub fn evaluate(&mut self, answers: &Questionnaire) -> ScoringResult {
        self.reset();
        self.process_background(answers);
        self.process_symptoms(answers);
        self.process_examination(answers);
        self.process_imaging(answers);
        self.finalize()
    }

    /// Adds the weights of `(category, item, variant)` to every diagnosis the
    /// entry names. Returns whether an entry matched; a miss is the normal
    /// outcome for an unanswered or unknown item.
    pub fn accumulate(
        &mut self,
        category: WeightCategory,
        item: &str,
        variant: Option<&str>,
        fallback_label: &str,
    ) -> bool {
        self.phase = EnginePhase::Accumulating;
        let config = self.config;
        let Some(entry) = config.lookup(category, item, variant) else {
            trace!(category = category.key(), item, ?variant, "no weight entry");
            return false;
        };
        self.apply(category, item, variant, entry, Reach::EVERY_TAG, fallback_label);
        true
    }

    /// String-keyed form of [`accumulate`](Self::accumulate).
    pub fn accumulate_key(
        &mut self,
        category: &str,
        item: &str,
        variant: Option<&str>,
        fallback_label: &str,
    ) -> bool {
        match WeightCategory::from_key(category) {
            Some(category) => self.accumulate(category, item, variant, fallback_label),
            None => {
                self.phase = EnginePhase::Accumulating;
                trace!(category, item, "unknown weight category");
                false
            }
        }
    }

    /// Applies an imaging finding, restricted to the diagnoses its route lists.
    pub fn accumulate_imaging(&mut self, route: &ImagingRoute) -> bool {
        self.phase = EnginePhase::Accumulating;
        let config = self.config;
        let Some(entry) =
            config.lookup(WeightCategory::Imaging, route.modality, Some(route.variant))
        else {
            trace!(finding = ?route.finding, "no weight entry for imaging finding");
            return false;
        };
        self.apply(
            WeightCategory::Imaging,
            route.modality,
            Some(route.variant),
            entry,
            Reach {
                affects: route.affects,
                score_only: route.score_only,
            },
            route.label,
        );
        true
    }

    fn apply(
        &mut self,
        category: WeightCategory,
        item: &str,
        variant: Option<&str>,
        entry: &WeightEntry,
        reach: Reach<'_>,
        fallback_label: &str,
    ) {
        for (&diagnosis, &weight) in &entry.weights {
            if !reach.affects.contains(&diagnosis) {
                continue;
            }
            *self.state.scores.entry(diagnosis).or_insert(0) += weight;

            if weight > 0 && !reach.score_only.contains(&diagnosis) {
                let rationale = entry
                    .rationale
                    .clone()
                    .unwrap_or_else(|| fallback_label.to_string());
                self.state.factors.push(ContributingFactor {
                    diagnosis,
                    category,
                    item: item.to_string(),
                    variant: variant.map(str::to_string),
                    score: weight.unsigned_abs(),
                    rationale,
                });
            }
        }
        trace!(category = category.key(), item, ?variant, "applied weight entry");
    }

    /// Records `flag` when the table marks it as a red flag. Never touches
    /// diagnosis scores.
    pub fn check_red_flag(&mut self, flag: &str) -> bool {
        self.phase = EnginePhase::Accumulating;
        match self.config.red_flag(flag) {
            Some(entry) if entry.is_red_flag => {
                self.state.red_flags.push(RedFlag {
                    flag: flag.to_string(),
                    rationale: entry.rationale.clone(),
                });
                true
            }
            _ => false,
        }
    }

    pub fn process_background(&mut self, answers: &Questionnaire) {
        use WeightCategory::Background;

        if let Some(age) = answers.age {
            self.accumulate(Background, "age", Some(age_bracket(age)), &format!("Age {age}"));
        }

        if let Some(bmi) = answers.body_mass_index() {
            if bmi >= HIGH_BMI_THRESHOLD {
                self.accumulate(Background, "highBMI", None, &format!("BMI {bmi:.1}"));
            }
        }

        let history = [
            ("kneeOA", answers.knee_oa, "Knee osteoarthritis"),
            (
                "patellarDislocation",
                answers.patellar_dislocation,
                "Prior patellar dislocation",
            ),
            (
                "meniscusLigament",
                answers.meniscus_ligament,
                "Prior meniscus or ligament injury",
            ),
        ];
        for (item, present, label) in history {
            if present {
                self.accumulate(Background, item, None, label);
            }
        }

        if let Some(activity) = non_blank(&answers.sports_activity) {
            self.accumulate(Background, "sportsActivity", Some(activity), "Sports activity");
        }
        if let Some(history) = non_blank(&answers.knee_history) {
            self.accumulate(
                Background,
                "kneeHistory",
                Some(history),
                "Knee surgery or injection history",
            );
        }
    }

    pub fn process_symptoms(&mut self, answers: &Questionnaire) {
        for location in &answers.pain_location {
            self.accumulate(WeightCategory::PainLocation, location, None, "Pain location");
        }
        for movement in &answers.provocative_movements {
            self.accumulate(
                WeightCategory::ProvocativeMovements,
                movement,
                None,
                "Provoking movement",
            );
        }

        let flags = [
            answers.rest_pain,
            answers.night_pain,
            answers.fever,
            answers.severe_swelling,
        ];
        for (flag, present) in RED_FLAG_SYMPTOMS.into_iter().zip(flags) {
            if present {
                self.check_red_flag(flag);
            }
        }

        let characters = [
            ("catchingClicking", answers.catching_clicking, "Catching or clicking"),
            ("locking", answers.locking, "Locking"),
            ("instability", answers.instability, "Instability"),
            ("localSwelling", answers.local_swelling, "Local swelling"),
            ("localHeat", answers.local_heat, "Local warmth"),
            ("jointEffusion", answers.joint_effusion, "Joint effusion"),
            ("burningTingling", answers.burning_tingling, "Burning or tingling"),
            ("numbness", answers.numbness, "Numbness"),
            ("other", answers.other_symptom, "Other symptom"),
        ];
        for (item, present, label) in characters {
            if present {
                self.accumulate(WeightCategory::SymptomCharacter, item, None, label);
            }
        }
    }

    pub fn process_examination(&mut self, answers: &Questionnaire) {
        use WeightCategory::{ManualTests, Palpation};

        if let Some(grade) = non_blank(&answers.tibial_tenderness) {
            self.accumulate(Palpation, "tibialTenderness", Some(grade), "Pes anserine tenderness");
        }
        let palpation = [
            ("jointLineTenderness", answers.joint_line_tenderness, "Joint-line tenderness"),
            (
                "patellarFacetTenderness",
                answers.patellar_facet_tenderness,
                "Patellar facet tenderness",
            ),
            ("plicaPalpation", answers.plica_palpation, "Palpable tender plica"),
            ("tibialNodule", answers.tibial_nodule, "Medial tibial nodule"),
            ("hoffaTenderness", answers.hoffa_tenderness, "Fat pad tenderness"),
            (
                "infrapatellarBranchTenderness",
                answers.infrapatellar_branch_tenderness,
                "Infrapatellar branch tenderness",
            ),
        ];
        for (item, present, label) in palpation {
            if present {
                self.accumulate(Palpation, item, None, label);
            }
        }

        if let Some(result) = non_blank(&answers.valgus_stress) {
            self.accumulate(ManualTests, "valgusStress", Some(result), "Valgus stress test");
        }
        if answers.squat_pain {
            self.accumulate(ManualTests, "squatPain", None, "Pain on squatting");
        }
        let tests = [
            ("clarkeTest", &answers.clarke_test, "Clarke test"),
            ("patellarTilt", &answers.patellar_tilt, "Patellar tilt test"),
            ("apprehension", &answers.apprehension, "Apprehension test"),
            ("mppTest", &answers.mpp_test, "MPP test"),
            ("stutterTest", &answers.stutter_test, "Stutter test"),
            ("hoffaTest", &answers.hoffa_test, "Hoffa test"),
            ("mcMurrayTest", &answers.mc_murray_test, "McMurray test"),
            ("apleyTest", &answers.apley_test, "Apley test"),
            ("thessalyTest", &answers.thessaly_test, "Thessaly test"),
            ("tinelSign", &answers.tinel_sign, "Tinel sign"),
        ];
        for (item, result, label) in tests {
            if let Some(result) = non_blank(result) {
                self.accumulate(ManualTests, item, Some(result), label);
            }
        }
    }

    pub fn process_imaging(&mut self, answers: &Questionnaire) {
        for finding in answers.imaging_findings() {
            self.accumulate_imaging(finding.route());
        }
    }

    /// Pure snapshot of the accumulated state; see [`finalize::finalize`].
    pub fn finalize(&self) -> ScoringResult {
        finalize::finalize(self.config, &self.state)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}
