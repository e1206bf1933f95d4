//! Built-in weight table.
//!
//! Weight arrays list the six musculoskeletal/neuropathic tags in fixed order:
//! `[pes, pfps, plica, hoffa, meniscus, saphenous]`. Only the catch-all
//! `other` items carry an `other` weight.

use std::collections::BTreeMap;

use super::diagnosis::Diagnosis;
use super::weights::{
    CategoryWeights, ItemWeights, RecommendationTiers, RedFlagEntry, ScoringConfig, SeverityBand,
    SeverityBands, WeightEntry,
};

const SCORED: [Diagnosis; 6] = [
    Diagnosis::Pes,
    Diagnosis::Pfps,
    Diagnosis::Plica,
    Diagnosis::Hoffa,
    Diagnosis::Meniscus,
    Diagnosis::Saphenous,
];

fn weights(values: [i32; 6]) -> BTreeMap<Diagnosis, i32> {
    SCORED.into_iter().zip(values).collect()
}

fn entry(values: [i32; 6], rationale: &str) -> WeightEntry {
    WeightEntry {
        weights: weights(values),
        rationale: Some(rationale.to_string()),
    }
}

fn unexplained(values: [i32; 6]) -> WeightEntry {
    WeightEntry {
        weights: weights(values),
        rationale: None,
    }
}

fn other(points: i32, rationale: &str) -> WeightEntry {
    let mut entry = entry([0; 6], rationale);
    entry.weights.insert(Diagnosis::Other, points);
    entry
}

fn direct(entry: WeightEntry) -> ItemWeights {
    ItemWeights::Direct(entry)
}

fn variants<const N: usize>(pairs: [(&str, WeightEntry); N]) -> ItemWeights {
    ItemWeights::Variants(
        pairs
            .into_iter()
            .map(|(variant, entry)| (variant.to_string(), entry))
            .collect(),
    )
}

/// Manual test where only a positive result carries weight.
fn positive_only(positive: WeightEntry) -> ItemWeights {
    variants([
        ("positive", positive),
        ("negative", unexplained([0; 6])),
        ("notDone", unexplained([0; 6])),
    ])
}

fn category<const N: usize>(items: [(&str, ItemWeights); N]) -> CategoryWeights {
    items
        .into_iter()
        .map(|(item, weights)| (item.to_string(), weights))
        .collect()
}

fn band(min: u32, max: u32, label: &str) -> SeverityBand {
    SeverityBand {
        min,
        max,
        label: label.to_string(),
    }
}

fn tiers(high: &[&str], moderate: &[&str]) -> RecommendationTiers {
    RecommendationTiers {
        high: high.iter().map(|line| line.to_string()).collect(),
        moderate: moderate.iter().map(|line| line.to_string()).collect(),
    }
}

fn red_flag(rationale: &str) -> RedFlagEntry {
    RedFlagEntry {
        is_red_flag: true,
        rationale: rationale.to_string(),
    }
}

pub(crate) fn standard_table() -> ScoringConfig {
    ScoringConfig {
        max_score: 20,
        severity: SeverityBands {
            low: band(0, 30, "Low"),
            moderate: band(31, 70, "Moderate"),
            high: band(71, 100, "High"),
        },
        background: background(),
        pain_location: pain_location(),
        provocative_movements: provocative_movements(),
        red_flags: red_flags(),
        symptom_character: symptom_character(),
        palpation: palpation(),
        manual_tests: manual_tests(),
        imaging: imaging(),
        recommendations: recommendations(),
    }
}

fn background() -> CategoryWeights {
    category([
        (
            "age",
            variants([
                (
                    "young",
                    entry(
                        [0, 2, 2, 2, 2, 1],
                        "Younger patients carry sports-related meniscal injury risk",
                    ),
                ),
                (
                    "middle",
                    entry(
                        [1, 1, 1, 1, 2, 1],
                        "Degenerative meniscal injury risk rises in middle age",
                    ),
                ),
                (
                    "senior",
                    entry(
                        [2, 1, 0, 1, 3, 2],
                        "Older patients also carry saphenous neuropathy risk",
                    ),
                ),
            ]),
        ),
        (
            "highBMI",
            direct(entry(
                [2, 1, 0, 1, 1, 1],
                "Obesity increases load across the knee",
            )),
        ),
        (
            "kneeOA",
            direct(entry(
                [2, 1, 0, 2, 3, 2],
                "Knee osteoarthritis often coexists with saphenous neuropathy",
            )),
        ),
        (
            "sportsActivity",
            variants([
                (
                    "competitive",
                    entry(
                        [1, 2, 2, 2, 3, 1],
                        "Competitive sport raises meniscal injury risk",
                    ),
                ),
                (
                    "recreational",
                    entry(
                        [1, 1, 1, 1, 1, 1],
                        "Recreational sport is mildly associated with every condition",
                    ),
                ),
                (
                    "none",
                    entry([0; 6], "No sports activity"),
                ),
            ]),
        ),
        (
            "kneeHistory",
            variants([
                (
                    "surgery",
                    entry(
                        [1, 0, 0, 0, 0, 4],
                        "Prior knee surgery, especially arthroplasty, strongly suggests saphenous neuropathy",
                    ),
                ),
                (
                    "injection",
                    entry(
                        [0, 0, 0, 0, 0, 2],
                        "Prior knee injections are a saphenous neuropathy risk",
                    ),
                ),
                ("none", entry([0; 6], "No prior surgery or injection")),
            ]),
        ),
    ])
}

fn pain_location() -> CategoryWeights {
    category([
        (
            "anteriorKnee",
            direct(entry(
                [0, 3, 1, 2, 0, 0],
                "Peripatellar pain strongly suggests PFPS",
            )),
        ),
        (
            "medialAnterior",
            direct(entry(
                [1, 1, 1, 1, 2, 2],
                "Anteromedial joint-line pain also raises saphenous neuropathy",
            )),
        ),
        (
            "tibialMedial",
            direct(entry(
                [4, -1, 0, 0, 0, 2],
                "Medial tibia 3-5 cm below the joint line points to pes anserine or saphenous nerve",
            )),
        ),
        (
            "anteromedial",
            direct(entry(
                [1, 1, 3, 1, 1, 2],
                "Anteromedial knee pain suggests plica or saphenous nerve",
            )),
        ),
        (
            "infrapatellar",
            direct(entry(
                [0, 1, 0, 4, 0, 3],
                "Pain either side of the patellar tendon also implicates the infrapatellar branch",
            )),
        ),
        (
            "medialJointLine",
            direct(entry(
                [0, 0, 1, 0, 4, 1],
                "Medial joint-line pain strongly suggests a medial meniscal tear",
            )),
        ),
        (
            "lateralJointLine",
            direct(entry(
                [0, 0, 0, 0, 4, 0],
                "Lateral joint-line pain strongly suggests a lateral meniscal tear",
            )),
        ),
        (
            "medialLowerLeg",
            direct(entry(
                [1, 0, 0, 0, 0, 4],
                "Pain radiating down the medial leg strongly suggests saphenous neuropathy",
            )),
        ),
        ("other", direct(other(3, "Other pain location"))),
    ])
}

fn provocative_movements() -> CategoryWeights {
    category([
        (
            "stairClimbing",
            direct(entry(
                [2, 2, 1, 1, 1, 1],
                "Stair pain is common to several conditions",
            )),
        ),
        (
            "stairDescending",
            direct(entry(
                [2, 2, 1, 1, 1, 1],
                "Pain descending stairs is especially common in PFPS",
            )),
        ),
        (
            "standingUp",
            direct(entry([2, 2, 1, 1, 1, 1], "Pain rising from a chair")),
        ),
        (
            "deepSquat",
            direct(entry(
                [1, 3, 2, 2, 3, 1],
                "Deep flexion loads the meniscus heavily",
            )),
        ),
        (
            "runningJumping",
            direct(entry([1, 2, 2, 2, 2, 1], "Pain when running or jumping")),
        ),
        (
            "theaterSign",
            direct(entry(
                [0, 3, 1, 1, 0, 0],
                "Theater sign is characteristic of PFPS",
            )),
        ),
        (
            "initialMovement",
            direct(entry([1, 1, 0, 1, 1, 1], "Start-up pain")),
        ),
        (
            "terminalExtension",
            direct(entry(
                [0, 1, 1, 4, 1, 0],
                "Pain at terminal extension strongly suggests Hoffa fat pad syndrome",
            )),
        ),
        (
            "weightBearingFlexion",
            direct(entry(
                [0, 2, 1, 4, 2, 1],
                "Pain on loaded flexion strongly suggests Hoffa fat pad syndrome",
            )),
        ),
        (
            "twistingPivot",
            direct(entry(
                [0, 1, 1, 0, 4, 0],
                "Pain on twisting or pivoting strongly suggests meniscal injury",
            )),
        ),
        (
            "prolongedSitting",
            direct(entry(
                [0, 1, 0, 0, 0, 3],
                "Worsening with prolonged sitting suggests saphenous neuropathy",
            )),
        ),
        ("other", direct(other(3, "Other provoking movement"))),
    ])
}

fn red_flags() -> BTreeMap<String, RedFlagEntry> {
    [
        (
            "restPain",
            red_flag("Pain at rest raises concern for infection or tumour"),
        ),
        ("nightPain", red_flag("Night pain suggests serious pathology")),
        ("fever", red_flag("Fever raises concern for infection")),
        (
            "severeSwelling",
            red_flag("Marked swelling suggests acute inflammation or infection"),
        ),
    ]
    .into_iter()
    .map(|(flag, entry)| (flag.to_string(), entry))
    .collect()
}

fn symptom_character() -> CategoryWeights {
    category([
        (
            "catchingClicking",
            direct(entry(
                [1, 1, 3, 0, 3, 0],
                "Catching suggests plica syndrome or meniscal injury",
            )),
        ),
        (
            "locking",
            direct(entry(
                [0, 0, 1, 0, 5, 0],
                "Locking strongly suggests meniscal injury",
            )),
        ),
        (
            "instability",
            direct(entry(
                [0, 1, 1, 0, 2, 0],
                "Giving way also warrants a ligament work-up",
            )),
        ),
        (
            "localSwelling",
            direct(entry([2, 1, 1, 2, 2, 0], "Local swelling suggests inflammation")),
        ),
        (
            "localHeat",
            direct(entry([1, 0, 0, 1, 1, 0], "Local warmth suggests inflammation")),
        ),
        (
            "jointEffusion",
            direct(entry(
                [0, 1, 0, 1, 3, 0],
                "Joint effusion suggests meniscal injury",
            )),
        ),
        (
            "burningTingling",
            direct(entry(
                [0, 0, 0, 0, 0, 5],
                "Burning or tingling strongly suggests saphenous neuropathy",
            )),
        ),
        (
            "numbness",
            direct(entry(
                [0, 0, 0, 0, 0, 5],
                "Numbness from the medial knee to the medial leg strongly suggests saphenous neuropathy",
            )),
        ),
        ("other", direct(other(3, "Other symptom"))),
    ])
}

fn palpation() -> CategoryWeights {
    category([
        (
            "tibialTenderness",
            variants([
                ("none", unexplained([0; 6])),
                ("mild", unexplained([2, 0, 0, 0, 0, 1])),
                (
                    "marked",
                    entry(
                        [4, -1, 0, 0, 0, 1],
                        "Focal pes anserine tenderness strongly suggests pes anserine bursitis",
                    ),
                ),
            ]),
        ),
        (
            "jointLineTenderness",
            direct(entry(
                [-1, 0, 0, 0, 4, 0],
                "Joint-line tenderness strongly suggests meniscal injury",
            )),
        ),
        (
            "patellarFacetTenderness",
            direct(entry(
                [0, 3, 1, 0, 0, 0],
                "Patellar facet tenderness suggests PFPS",
            )),
        ),
        (
            "plicaPalpation",
            direct(entry(
                [0, 0, 4, 0, 0, 0],
                "A palpable, tender plica strongly suggests plica syndrome",
            )),
        ),
        (
            "tibialNodule",
            direct(entry(
                [2, 0, 0, 0, 0, 0],
                "A pes anserine nodule suggests chronic bursitis",
            )),
        ),
        (
            "hoffaTenderness",
            direct(entry(
                [0, 0, 0, 4, 0, 0],
                "Fat pad tenderness either side of the patellar tendon strongly suggests Hoffa fat pad syndrome",
            )),
        ),
        (
            "infrapatellarBranchTenderness",
            direct(entry(
                [0, 0, 0, 0, 0, 5],
                "Tenderness over the infrapatellar branch strongly suggests saphenous neuropathy",
            )),
        ),
    ])
}

fn manual_tests() -> CategoryWeights {
    category([
        (
            "valgusStress",
            variants([
                (
                    "negative",
                    entry([1, 0, 0, 0, 0, 0], "An intact MCL supports pes anserine bursitis"),
                ),
                (
                    "positive",
                    entry([-1, 0, 0, 0, 0, 0], "Suggests an MCL injury"),
                ),
                ("notDone", unexplained([0; 6])),
            ]),
        ),
        (
            "squatPain",
            direct(entry(
                [0, 3, 1, 1, 1, 0],
                "Peripatellar pain on squatting suggests PFPS",
            )),
        ),
        (
            "clarkeTest",
            positive_only(entry([0, 3, 1, 0, 0, 0], "A positive Clarke test suggests PFPS")),
        ),
        (
            "patellarTilt",
            positive_only(entry(
                [0, 4, 1, 0, 0, 0],
                "A positive patellar tilt test suggests PFPS",
            )),
        ),
        (
            "apprehension",
            positive_only(entry(
                [0, 2, 0, 0, 0, 0],
                "Positive apprehension suggests patellar instability",
            )),
        ),
        (
            "mppTest",
            positive_only(entry(
                [0, 0, 5, 0, 0, 0],
                "A positive MPP test strongly suggests plica syndrome",
            )),
        ),
        (
            "stutterTest",
            positive_only(entry(
                [0, 0, 3, 0, 0, 0],
                "A positive stutter test suggests plica syndrome",
            )),
        ),
        (
            "hoffaTest",
            positive_only(entry(
                [0, 0, 0, 5, 0, 0],
                "A positive Hoffa test strongly suggests fat pad inflammation",
            )),
        ),
        (
            "mcMurrayTest",
            positive_only(entry(
                [0, 0, 0, 0, 5, 0],
                "A positive McMurray test strongly suggests meniscal injury",
            )),
        ),
        (
            "apleyTest",
            positive_only(entry(
                [0, 0, 0, 0, 4, 0],
                "A positive Apley test suggests meniscal injury",
            )),
        ),
        (
            "thessalyTest",
            positive_only(entry(
                [0, 0, 0, 0, 4, 0],
                "A positive Thessaly test suggests meniscal injury",
            )),
        ),
        (
            "tinelSign",
            positive_only(entry(
                [0, 0, 0, 0, 0, 5],
                "A positive Tinel sign at the adductor canal or infrapatellar branch strongly suggests saphenous neuropathy",
            )),
        ),
    ])
}

fn imaging() -> CategoryWeights {
    category([
        (
            "xray",
            variants([
                (
                    "oaChanges",
                    entry(
                        [1, 1, 0, 1, 2, 1],
                        "Osteoarthritic change frequently accompanies meniscal injury",
                    ),
                ),
                (
                    "pesSpurs",
                    entry([2, 0, 0, 0, 0, 0], "Spurs near the pes anserine suggest chronic bursitis"),
                ),
                (
                    "patellarMalalignment",
                    entry([0, 3, 1, 1, 0, 0], "Patellar malalignment suggests PFPS"),
                ),
            ]),
        ),
        (
            "ultrasound",
            variants([
                (
                    "pesBursaSwelling",
                    entry(
                        [4, 0, 0, 0, 0, 0],
                        "Fluid in the pes anserine bursa strongly suggests bursitis",
                    ),
                ),
                (
                    "plicaThickening",
                    entry(
                        [0, 0, 4, 0, 0, 0],
                        "A thickened plica strongly suggests plica syndrome",
                    ),
                ),
                (
                    "patellarTendonChanges",
                    entry(
                        [0, 2, 0, 1, 0, 0],
                        "Patellar tendon changes also raise jumper's knee",
                    ),
                ),
                (
                    "hoffaSwelling",
                    entry(
                        [0, 0, 0, 4, 0, 0],
                        "An enlarged, hyperechoic fat pad strongly suggests Hoffa fat pad syndrome",
                    ),
                ),
                (
                    "meniscusExtrusion",
                    entry([0, 0, 0, 0, 3, 0], "Meniscal extrusion on ultrasound suggests a tear"),
                ),
                (
                    "saphenousNerveSwelling",
                    entry(
                        [0, 0, 0, 0, 0, 4],
                        "Swelling of the saphenous nerve or its infrapatellar branch suggests neuropathy",
                    ),
                ),
            ]),
        ),
        (
            "mri",
            variants([
                (
                    "pesTendonChanges",
                    entry([4, 0, 0, 0, 0, 0], "Pes anserine tendon changes on MRI are definitive"),
                ),
                (
                    "plicaEdema",
                    entry([0, 0, 4, 0, 0, 0], "Plica changes on MRI are definitive"),
                ),
                (
                    "pfCartilage",
                    entry(
                        [0, 3, 1, 0, 0, 0],
                        "Patellofemoral cartilage degeneration suggests PFPS",
                    ),
                ),
                (
                    "hoffaEdema",
                    entry([0, 0, 0, 4, 0, 0], "Fat pad oedema on MRI is definitive"),
                ),
                (
                    "meniscusTear",
                    entry([0, 0, 0, 0, 5, 0], "A meniscal tear on MRI is definitive"),
                ),
                (
                    "saphenousNerveSignal",
                    entry(
                        [0, 0, 0, 0, 0, 4],
                        "High saphenous nerve signal on MRI suggests neuropathy",
                    ),
                ),
                (
                    "meniscusLigament",
                    entry(
                        [-1, -1, -1, -1, 0, -1],
                        "A ligament injury points to a different diagnosis",
                    ),
                ),
            ]),
        ),
    ])
}

fn recommendations() -> BTreeMap<Diagnosis, RecommendationTiers> {
    BTreeMap::from([
        (
            Diagnosis::Pes,
            tiers(
                &[
                    "Re-check pes anserine tenderness and localise it precisely",
                    "Rule out MCL and medial meniscal injury",
                    "Consider ultrasound or MRI of the pes anserine bursa",
                    "Assess loading and gait for excessive valgus moment",
                ],
                &[
                    "Palpate the pes anserine region in detail",
                    "Differentiate medial structures (MCL, medial meniscus)",
                    "Assess posture and gait",
                ],
            ),
        ),
        (
            Diagnosis::Pfps,
            tiers(
                &[
                    "Assess hip abductor and external rotator strength",
                    "Analyse squat and step-down mechanics",
                    "Evaluate patellar tracking",
                    "Assess core stability",
                ],
                &[
                    "Assess patellar mobility and tilt",
                    "Assess lower-limb alignment",
                    "Assess quadriceps flexibility",
                ],
            ),
        ),
        (
            Diagnosis::Plica,
            tiers(
                &[
                    "Repeat the MPP test",
                    "Palpate the plica and assess its mobility",
                    "Consider ultrasound or MRI to confirm plica thickening",
                    "Consider orthopaedic referral if symptoms persist",
                ],
                &[
                    "Palpate the anteromedial knee in detail",
                    "Check whether catching is reproducible",
                    "Differentiate from other peripatellar lesions",
                ],
            ),
        ),
        (
            Diagnosis::Hoffa,
            tiers(
                &[
                    "Re-check fat pad tenderness",
                    "Confirm symptom reproduction at terminal extension",
                    "Consider ultrasound or MRI of the fat pad",
                    "Assess knee hyperextension habits and posture",
                ],
                &[
                    "Palpate either side of the patellar tendon",
                    "Characterise pain on knee extension",
                    "Differentiate from jumper's knee",
                ],
            ),
        ),
        (
            Diagnosis::Meniscus,
            tiers(
                &[
                    "Repeat McMurray, Apley and Thessaly tests",
                    "Characterise joint-line tenderness in detail",
                    "MRI strongly recommended",
                    "Refer to orthopaedics if symptoms persist or locking occurs",
                ],
                &[
                    "Perform a detailed meniscal test battery",
                    "Rule out ACL and MCL injury",
                    "Assess range of motion and strength",
                ],
            ),
        ),
        (
            Diagnosis::Saphenous,
            tiers(
                &[
                    "Check tenderness along the saphenous nerve from the adductor canal to the infrapatellar branch",
                    "Repeat the Tinel sign",
                    "Perform sensory testing from the medial knee to the medial leg",
                    "Consider a diagnostic nerve block or pain clinic referral",
                ],
                &[
                    "Palpate the infrapatellar branch",
                    "Differentiate from pes anserine bursitis and plica syndrome",
                    "Characterise numbness and burning in detail",
                ],
            ),
        ),
    ])
}
