use serde::{Deserialize, Serialize};

use super::diagnosis::Diagnosis;

/// Boolean imaging findings collected on the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImagingFinding {
    XrayOa,
    XrayPesSpurs,
    XrayPatellar,
    UsPesBursa,
    UsPlica,
    UsPatellarTendon,
    UsHoffa,
    UsMeniscus,
    UsSaphenous,
    MriPes,
    MriPlica,
    MriPf,
    MriHoffa,
    MriMeniscus,
    MriSaphenous,
    MriMeniscusLigament,
}

impl ImagingFinding {
    pub const ALL: [ImagingFinding; 16] = [
        ImagingFinding::XrayOa,
        ImagingFinding::XrayPesSpurs,
        ImagingFinding::XrayPatellar,
        ImagingFinding::UsPesBursa,
        ImagingFinding::UsPlica,
        ImagingFinding::UsPatellarTendon,
        ImagingFinding::UsHoffa,
        ImagingFinding::UsMeniscus,
        ImagingFinding::UsSaphenous,
        ImagingFinding::MriPes,
        ImagingFinding::MriPlica,
        ImagingFinding::MriPf,
        ImagingFinding::MriHoffa,
        ImagingFinding::MriMeniscus,
        ImagingFinding::MriSaphenous,
        ImagingFinding::MriMeniscusLigament,
    ];

    pub fn route(self) -> &'static ImagingRoute {
        // IMAGING_ROUTES is declared in `ALL` order, one row per finding.
        &IMAGING_ROUTES[self as usize]
    }
}

/// Where an imaging finding lives in the weight table and which diagnoses it
/// is allowed to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagingRoute {
    pub finding: ImagingFinding,
    /// Item key under the `imaging` category.
    pub modality: &'static str,
    /// Variant key under the modality item.
    pub variant: &'static str,
    pub affects: &'static [Diagnosis],
    /// Subset of `affects` whose score moves without a contributing factor.
    pub score_only: &'static [Diagnosis],
    pub label: &'static str,
}

const EVERY_TAG: &[Diagnosis] = &Diagnosis::ALL;

const fn route(
    finding: ImagingFinding,
    modality: &'static str,
    variant: &'static str,
    affects: &'static [Diagnosis],
    label: &'static str,
) -> ImagingRoute {
    ImagingRoute {
        finding,
        modality,
        variant,
        affects,
        score_only: &[],
        label,
    }
}

/// X-ray findings move every tag their entry names; ultrasound and MRI
/// findings only move the listed diagnoses.
pub const IMAGING_ROUTES: [ImagingRoute; 16] = [
    route(ImagingFinding::XrayOa, "xray", "oaChanges", EVERY_TAG, "X-ray osteoarthritic change"),
    route(ImagingFinding::XrayPesSpurs, "xray", "pesSpurs", EVERY_TAG, "X-ray pes anserine spurs"),
    route(
        ImagingFinding::XrayPatellar,
        "xray",
        "patellarMalalignment",
        EVERY_TAG,
        "X-ray patellar malalignment",
    ),
    route(
        ImagingFinding::UsPesBursa,
        "ultrasound",
        "pesBursaSwelling",
        &[Diagnosis::Pes],
        "Ultrasound pes anserine bursa swelling",
    ),
    route(
        ImagingFinding::UsPlica,
        "ultrasound",
        "plicaThickening",
        &[Diagnosis::Plica],
        "Ultrasound plica thickening",
    ),
    ImagingRoute {
        finding: ImagingFinding::UsPatellarTendon,
        modality: "ultrasound",
        variant: "patellarTendonChanges",
        affects: &[Diagnosis::Pfps, Diagnosis::Hoffa],
        score_only: &[Diagnosis::Hoffa],
        label: "Ultrasound patellar tendon changes",
    },
    route(
        ImagingFinding::UsHoffa,
        "ultrasound",
        "hoffaSwelling",
        &[Diagnosis::Hoffa],
        "Ultrasound fat pad swelling",
    ),
    route(
        ImagingFinding::UsMeniscus,
        "ultrasound",
        "meniscusExtrusion",
        &[Diagnosis::Meniscus],
        "Ultrasound meniscal extrusion",
    ),
    route(
        ImagingFinding::UsSaphenous,
        "ultrasound",
        "saphenousNerveSwelling",
        &[Diagnosis::Saphenous],
        "Ultrasound saphenous nerve swelling",
    ),
    route(
        ImagingFinding::MriPes,
        "mri",
        "pesTendonChanges",
        &[Diagnosis::Pes],
        "MRI pes anserine tendon changes",
    ),
    route(ImagingFinding::MriPlica, "mri", "plicaEdema", &[Diagnosis::Plica], "MRI plica oedema"),
    route(
        ImagingFinding::MriPf,
        "mri",
        "pfCartilage",
        &[Diagnosis::Pfps],
        "MRI patellofemoral cartilage degeneration",
    ),
    route(ImagingFinding::MriHoffa, "mri", "hoffaEdema", &[Diagnosis::Hoffa], "MRI fat pad oedema"),
    route(
        ImagingFinding::MriMeniscus,
        "mri",
        "meniscusTear",
        &[Diagnosis::Meniscus],
        "MRI meniscal tear",
    ),
    route(
        ImagingFinding::MriSaphenous,
        "mri",
        "saphenousNerveSignal",
        &[Diagnosis::Saphenous],
        "MRI saphenous nerve signal change",
    ),
    route(
        ImagingFinding::MriMeniscusLigament,
        "mri",
        "meniscusLigament",
        &[
            Diagnosis::Pes,
            Diagnosis::Pfps,
            Diagnosis::Plica,
            Diagnosis::Hoffa,
            Diagnosis::Saphenous,
        ],
        "MRI ligament injury",
    ),
];
