//! Nursing evaluation document ("valutazione infermieristica"), schema version 1.
//!
//! This module defines the JSON shape stored in a module entry's `data` for module
//! [`MODULE_CODE`](crate::MODULE_CODE). Section and field names are part of the storage contract
//! and must not be renamed.
//!
//! Responsibilities:
//! - Define the document model for serialisation/deserialisation.
//! - Tolerate stored documents with missing keys, `null` values, non-array multi-selects and
//!   numeric option identifiers.
//! - Reject unknown keys and wrong scalar types, reporting the failing path.
//! - Validate option vocabularies and numeric bounds.
//!
//! Notes:
//! - Every section and field is optional. Documents produced from form controls always carry
//!   every key, with `null` for blank scalars and `[]` for empty multi-selects.
//! - `paziente.imc_kg_m2` and `anamnesi_ed_esame_obiettivo.alimentazione_e_idratazione.imc`
//!   are independent values; no reconciliation is applied.

use crate::vocabulary as vocab;
use crate::wire::{
    check_choice, check_float, check_int, check_len, check_options, choice, from_value_with_path,
    option_list,
};
use crate::ModuliResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const MAX_NAME_LEN: usize = 200;

/// Root of the nursing evaluation document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValutazioneInfermieristicaV1 {
    pub utente: Option<Utente>,
    pub paziente: Option<Paziente>,
    pub rilievo_parametri_vitali: Option<RilievoParametriVitali>,
    pub modello_di_percezione_e_di_gestione_della_salute: Option<ModelloPercezioneGestioneSalute>,
    pub allergie_riferite: Option<AllergieRiferite>,
    pub attivita_fisiche_sportive: Option<bool>,
    pub patologie_croniche: Option<bool>,
    pub quali_patologie_croniche: Option<String>,
    pub anamnesi_ed_esame_obiettivo: Option<AnamnesiEsameObiettivo>,
    pub tao: Option<bool>,
    pub ossigenoterapia: Option<bool>,
    pub farmaci_h: Option<bool>,
    pub diagnosi_infermieristica: Option<DiagnosiInfermieristica>,
    pub valutazione_bisogni_infermieristici: Option<String>,
    pub cadenza_monitoraggio_clinico_parametri_vitali: Option<String>,
    pub patologie_da_monitorare: Option<String>,
    pub valutazione_del_rischio: Option<ValutazioneDelRischio>,
    pub scale_utilizzate: Option<String>,
    pub data: Option<NaiveDate>,
    pub infermiere_compilatore: Option<String>,
    pub firma: Option<String>,
}

/// Compiling staff initials, dossier reference and facility type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Utente {
    #[serde(rename = "inizNome")]
    pub iniz_nome: Option<String>,
    #[serde(rename = "inizCognome")]
    pub iniz_cognome: Option<String>,
    pub dossier: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub struttura: Option<String>,
}

/// Patient identity snapshot and anthropometric measures.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Paziente {
    pub paziente_nominativo: Option<String>,
    pub anno: Option<i64>,
    pub numero_progressivo: Option<i64>,
    pub peso_kg: Option<f64>,
    pub altezza_mt: Option<f64>,
    pub imc_kg_m2: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RilievoParametriVitali {
    pub frequenza_cardiaca_b_min: Option<i64>,
    pub temperatura_corporea_c: Option<f64>,
    pub pressione_arteriosa_mmhg: Option<String>,
    pub ecg: Option<bool>,
    pub frequenza_respiratoria_atti_min: Option<i64>,
    pub sato2: Option<f64>,
    pub altro_parametri_vitali: Option<String>,
}

/// Lifestyle: tobacco and alcohol.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelloPercezioneGestioneSalute {
    pub consumo_tabacco: Option<bool>,
    pub quantita_tabacco_die_numero_sigarette: Option<i64>,
    pub interrotto_consumo_tabacco: Option<bool>,
    pub data_interruzione_tabacco: Option<NaiveDate>,
    pub consumo_alcolici: Option<bool>,
    pub quantita_alcolici_die_cl: Option<i64>,
    pub interrotto_consumo_alcolici: Option<bool>,
    pub data_interruzione_alcolici: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllergieRiferite {
    pub farmaci: Option<String>,
    pub alimenti: Option<String>,
    pub altro_allergie: Option<String>,
}

/// History and physical examination, split into eight sub-sections.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnamnesiEsameObiettivo {
    pub comunicazione: Option<Comunicazione>,
    pub respirazione: Option<Respirazione>,
    pub circolazione_e_tessuti_cutanei: Option<CircolazioneTessutiCutanei>,
    pub stato: Option<Stato>,
    pub movimento_igiene: Option<MovimentoIgiene>,
    pub eliminazione_intestinale: Option<EliminazioneIntestinale>,
    pub eliminazione_vescicale_urinaria: Option<EliminazioneVescicaleUrinaria>,
    pub alimentazione_e_idratazione: Option<AlimentazioneIdratazione>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Comunicazione {
    #[serde(deserialize_with = "choice")]
    pub stato_di_coscienza: Option<String>,
    #[serde(deserialize_with = "option_list")]
    pub comunicazione: Vec<String>,
    #[serde(deserialize_with = "option_list")]
    pub udito: Vec<String>,
    #[serde(deserialize_with = "choice")]
    pub sordita_lato: Option<String>,
    pub protesi_udito: Option<bool>,
    #[serde(deserialize_with = "choice")]
    pub protesi_udito_lato: Option<String>,
    #[serde(deserialize_with = "option_list")]
    pub vista: Vec<String>,
    #[serde(deserialize_with = "option_list")]
    pub protesi_vista: Vec<String>,
    #[serde(deserialize_with = "option_list")]
    pub condizioni_psichiche: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Respirazione {
    #[serde(deserialize_with = "choice")]
    pub tipologia: Option<String>,
    #[serde(deserialize_with = "option_list")]
    pub dispnea_tipo: Vec<String>,
    pub presenza_di_tosse: Option<bool>,
    pub trattamento_o2: Option<bool>,
    pub ossigenoterapia_l_min: Option<f64>,
    pub aspirazioni_secrezioni: Option<bool>,
    #[serde(deserialize_with = "option_list")]
    pub allergie_respirazione: Vec<String>,
    #[serde(deserialize_with = "option_list")]
    pub presidi_respirazione: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircolazioneTessutiCutanei {
    #[serde(deserialize_with = "option_list")]
    pub presidi_protesi: Vec<String>,
    pub altro_presidi_protesi: Option<String>,
    #[serde(deserialize_with = "option_list")]
    pub cute_mucose: Vec<String>,
    #[serde(deserialize_with = "option_list")]
    pub integrita_cutanea: Vec<String>,
    pub presenza_lesioni_da_decubito_sede: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub stadio_lesioni_da_decubito: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub rischio_lesioni_scala_braden: Option<String>,
}

/// Musculoskeletal, psycho-behavioural and pain status.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Stato {
    #[serde(deserialize_with = "choice")]
    pub escursione_articolare: Option<String>,
    pub altro_escursione_articolare: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub presa_delle_mani: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub debolezza_mani_lato: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub paralisi_mani_lato: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub presa_arti_inferiori: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub debolezza_arti_inferiori_lato: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub paralisi_arti_inferiori_lato: Option<String>,
    pub depressione: Option<bool>,
    #[serde(deserialize_with = "choice")]
    pub ansia: Option<String>,
    pub agitazione: Option<bool>,
    #[serde(deserialize_with = "option_list")]
    pub riposo_sonno: Vec<String>,
    #[serde(deserialize_with = "option_list")]
    pub tipo_dolore: Vec<String>,
    pub sede_dolore_acuto: Option<String>,
    pub sede_dolore_cronico: Option<String>,
    #[serde(deserialize_with = "option_list")]
    pub caratteristiche_dolore: Vec<String>,
    #[serde(deserialize_with = "option_list")]
    pub terapia_antidolorifica: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovimentoIgiene {
    #[serde(deserialize_with = "choice")]
    pub autonomia_movimento: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub rischio_cadute_conley: Option<String>,
    #[serde(deserialize_with = "option_list")]
    pub ausili_presidi_movimento: Vec<String>,
    #[serde(deserialize_with = "choice")]
    pub autonomia_postura: Option<String>,
    #[serde(deserialize_with = "option_list")]
    pub postura_obbligata_causa: Vec<String>,
    #[serde(deserialize_with = "option_list")]
    pub ausili_presidi_postura: Vec<String>,
    pub altro_ausili_presidi_postura: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub lavarsi: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub vestirsi: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub autonomia_wc: Option<String>,
    pub altro_uso_wc: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub autonomia_doccia: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EliminazioneIntestinale {
    #[serde(deserialize_with = "choice")]
    pub grado_autonomia: Option<String>,
    pub frequenza_evacuazioni_n: Option<i64>,
    // Historical key spelling, kept for compatibility with stored entries.
    pub data_utlima_evacuazione: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub consistenza: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub colore: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub presidi: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EliminazioneVescicaleUrinaria {
    #[serde(deserialize_with = "choice")]
    pub grado_autonomia: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub incontinente_tipo: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub minzione: Option<String>,
    pub frequenza_die: Option<i64>,
    pub diuresi_ml_24ore: Option<i64>,
    #[serde(deserialize_with = "choice")]
    pub diuresi_regolarita: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub caratteristiche: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub presidi_urinaria: Option<String>,
    pub stomia_tipo: Option<String>,
    pub infezioni_urinarie: Option<bool>,
    pub se_si_specificare_segni_e_sintomi: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlimentazioneIdratazione {
    #[serde(deserialize_with = "choice")]
    pub autonomia: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub deglutizione: Option<String>,
    #[serde(deserialize_with = "option_list")]
    pub protesi: Vec<String>,
    #[serde(deserialize_with = "option_list")]
    pub presidi: Vec<String>,
    pub altro_presidi: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub dieta: Option<String>,
    pub dieta_speciale_specifica: Option<String>,
    pub restrizioni_dietetiche: Option<String>,
    pub intolleranze: Option<String>,
    pub allergie: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub cavo_orale: Option<String>,
    pub altro_cavo_orale: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub stato_nutrizionale_scala_mna: Option<String>,
    pub variazioni_peso_ultimi_mesi: Option<i64>,
    pub variazione_peso_kg: Option<f64>,
    #[serde(deserialize_with = "choice")]
    pub tipo_variazione_peso: Option<String>,
    pub peso_kg: Option<f64>,
    pub altezza_mt: Option<f64>,
    pub imc: Option<f64>,
    #[serde(deserialize_with = "choice")]
    pub grado_obesita: Option<String>,
    #[serde(deserialize_with = "option_list")]
    pub presenza_di: Vec<String>,
    #[serde(deserialize_with = "option_list")]
    pub addome: Vec<String>,
    #[serde(deserialize_with = "choice")]
    pub idratazione_stato: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub idratazione_autonomia: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosiInfermieristica {
    pub patologia_prevalente: Option<String>,
    pub patologia_secondaria_1: Option<String>,
    pub patologia_secondaria_2: Option<String>,
}

/// Risk-scale selections.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValutazioneDelRischio {
    #[serde(deserialize_with = "choice")]
    pub rischio_cadute_scala_di_conley: Option<String>,
    #[serde(deserialize_with = "choice")]
    pub rischio_infezioni_ica: Option<String>,
}

impl ValutazioneInfermieristicaV1 {
    /// Strictly parse a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ModuliError::Translation`](crate::ModuliError::Translation) naming the failing
    /// path if the value is not an object, contains unknown keys or has a field of the wrong
    /// type.
    pub fn from_json_value(value: serde_json::Value) -> ModuliResult<Self> {
        from_value_with_path("valutazione infermieristica", value)
    }

    /// Validate option vocabularies and numeric bounds across every present section.
    ///
    /// # Errors
    ///
    /// Returns [`ModuliError::InvalidValue`](crate::ModuliError::InvalidValue) for the first
    /// offending field, with its dotted path.
    pub fn validate(&self) -> ModuliResult<()> {
        if let Some(utente) = &self.utente {
            utente.validate()?;
        }
        if let Some(paziente) = &self.paziente {
            paziente.validate()?;
        }
        if let Some(anamnesi) = &self.anamnesi_ed_esame_obiettivo {
            anamnesi.validate()?;
        }
        if let Some(rischio) = &self.valutazione_del_rischio {
            check_choice(
                "valutazione_del_rischio.rischio_cadute_scala_di_conley",
                &rischio.rischio_cadute_scala_di_conley,
                vocab::LIVELLO_RISCHIO,
            )?;
            check_choice(
                "valutazione_del_rischio.rischio_infezioni_ica",
                &rischio.rischio_infezioni_ica,
                vocab::LIVELLO_RISCHIO,
            )?;
        }
        Ok(())
    }
}

impl Utente {
    fn validate(&self) -> ModuliResult<()> {
        check_len("utente.inizNome", &self.iniz_nome, MAX_NAME_LEN)?;
        check_len("utente.inizCognome", &self.iniz_cognome, MAX_NAME_LEN)?;
        check_choice("utente.struttura", &self.struttura, vocab::STRUTTURA)
    }
}

impl Paziente {
    fn validate(&self) -> ModuliResult<()> {
        check_len(
            "paziente.paziente_nominativo",
            &self.paziente_nominativo,
            MAX_NAME_LEN,
        )?;
        check_int("paziente.anno", self.anno, 2000, Some(2100))?;
        check_int("paziente.numero_progressivo", self.numero_progressivo, 1, None)?;
        check_float("paziente.peso_kg", self.peso_kg, 0.0, None)?;
        check_float("paziente.altezza_mt", self.altezza_mt, 0.0, None)?;
        check_float("paziente.imc_kg_m2", self.imc_kg_m2, 0.0, None)
    }
}

impl AnamnesiEsameObiettivo {
    fn validate(&self) -> ModuliResult<()> {
        const P: &str = "anamnesi_ed_esame_obiettivo";

        if let Some(c) = &self.comunicazione {
            check_choice(
                &format!("{P}.comunicazione.stato_di_coscienza"),
                &c.stato_di_coscienza,
                vocab::STATO_DI_COSCIENZA,
            )?;
            check_options(
                &format!("{P}.comunicazione.comunicazione"),
                &c.comunicazione,
                vocab::COMUNICAZIONE,
            )?;
            check_options(&format!("{P}.comunicazione.udito"), &c.udito, vocab::UDITO)?;
            check_choice(
                &format!("{P}.comunicazione.sordita_lato"),
                &c.sordita_lato,
                vocab::LATO,
            )?;
            check_choice(
                &format!("{P}.comunicazione.protesi_udito_lato"),
                &c.protesi_udito_lato,
                vocab::LATO,
            )?;
            check_options(&format!("{P}.comunicazione.vista"), &c.vista, vocab::VISTA)?;
            check_options(
                &format!("{P}.comunicazione.protesi_vista"),
                &c.protesi_vista,
                vocab::PROTESI_VISTA,
            )?;
            check_options(
                &format!("{P}.comunicazione.condizioni_psichiche"),
                &c.condizioni_psichiche,
                vocab::CONDIZIONI_PSICHICHE,
            )?;
        }

        if let Some(r) = &self.respirazione {
            check_choice(
                &format!("{P}.respirazione.tipologia"),
                &r.tipologia,
                vocab::TIPOLOGIA_RESPIRAZIONE,
            )?;
            check_options(
                &format!("{P}.respirazione.dispnea_tipo"),
                &r.dispnea_tipo,
                vocab::DISPNEA_TIPO,
            )?;
            check_float(
                &format!("{P}.respirazione.ossigenoterapia_l_min"),
                r.ossigenoterapia_l_min,
                0.0,
                None,
            )?;
            check_options(
                &format!("{P}.respirazione.allergie_respirazione"),
                &r.allergie_respirazione,
                vocab::ALLERGIE_RESPIRAZIONE,
            )?;
            check_options(
                &format!("{P}.respirazione.presidi_respirazione"),
                &r.presidi_respirazione,
                vocab::PRESIDI_RESPIRAZIONE,
            )?;
        }

        if let Some(c) = &self.circolazione_e_tessuti_cutanei {
            let p = format!("{P}.circolazione_e_tessuti_cutanei");
            check_options(
                &format!("{p}.presidi_protesi"),
                &c.presidi_protesi,
                vocab::PRESIDI_PROTESI,
            )?;
            check_options(&format!("{p}.cute_mucose"), &c.cute_mucose, vocab::CUTE_MUCOSE)?;
            check_options(
                &format!("{p}.integrita_cutanea"),
                &c.integrita_cutanea,
                vocab::INTEGRITA_CUTANEA,
            )?;
            check_choice(
                &format!("{p}.stadio_lesioni_da_decubito"),
                &c.stadio_lesioni_da_decubito,
                vocab::STADIO_LESIONI_DA_DECUBITO,
            )?;
            check_choice(
                &format!("{p}.rischio_lesioni_scala_braden"),
                &c.rischio_lesioni_scala_braden,
                vocab::RISCHIO_LESIONI_BRADEN,
            )?;
        }

        if let Some(s) = &self.stato {
            let p = format!("{P}.stato");
            check_choice(
                &format!("{p}.escursione_articolare"),
                &s.escursione_articolare,
                vocab::ESCURSIONE_ARTICOLARE,
            )?;
            check_choice(&format!("{p}.presa_delle_mani"), &s.presa_delle_mani, vocab::PRESA)?;
            check_choice(
                &format!("{p}.debolezza_mani_lato"),
                &s.debolezza_mani_lato,
                vocab::LATO,
            )?;
            check_choice(
                &format!("{p}.paralisi_mani_lato"),
                &s.paralisi_mani_lato,
                vocab::LATO,
            )?;
            check_choice(
                &format!("{p}.presa_arti_inferiori"),
                &s.presa_arti_inferiori,
                vocab::PRESA,
            )?;
            check_choice(
                &format!("{p}.debolezza_arti_inferiori_lato"),
                &s.debolezza_arti_inferiori_lato,
                vocab::LATO,
            )?;
            check_choice(
                &format!("{p}.paralisi_arti_inferiori_lato"),
                &s.paralisi_arti_inferiori_lato,
                vocab::LATO,
            )?;
            check_choice(&format!("{p}.ansia"), &s.ansia, vocab::ANSIA)?;
            check_options(&format!("{p}.riposo_sonno"), &s.riposo_sonno, vocab::RIPOSO_SONNO)?;
            check_options(&format!("{p}.tipo_dolore"), &s.tipo_dolore, vocab::TIPO_DOLORE)?;
            check_options(
                &format!("{p}.caratteristiche_dolore"),
                &s.caratteristiche_dolore,
                vocab::CARATTERISTICHE_DOLORE,
            )?;
            check_options(
                &format!("{p}.terapia_antidolorifica"),
                &s.terapia_antidolorifica,
                vocab::TERAPIA_ANTIDOLORIFICA,
            )?;
        }

        if let Some(m) = &self.movimento_igiene {
            let p = format!("{P}.movimento_igiene");
            check_choice(
                &format!("{p}.autonomia_movimento"),
                &m.autonomia_movimento,
                vocab::AUTONOMIA_MOVIMENTO,
            )?;
            check_choice(
                &format!("{p}.rischio_cadute_conley"),
                &m.rischio_cadute_conley,
                vocab::RISCHIO_CADUTE_CONLEY,
            )?;
            check_options(
                &format!("{p}.ausili_presidi_movimento"),
                &m.ausili_presidi_movimento,
                vocab::AUSILI_PRESIDI_MOVIMENTO,
            )?;
            check_choice(
                &format!("{p}.autonomia_postura"),
                &m.autonomia_postura,
                vocab::AUTONOMIA_POSTURA,
            )?;
            check_options(
                &format!("{p}.postura_obbligata_causa"),
                &m.postura_obbligata_causa,
                vocab::POSTURA_OBBLIGATA_CAUSA,
            )?;
            check_options(
                &format!("{p}.ausili_presidi_postura"),
                &m.ausili_presidi_postura,
                vocab::AUSILI_PRESIDI_POSTURA,
            )?;
            check_choice(&format!("{p}.lavarsi"), &m.lavarsi, vocab::LAVARSI)?;
            check_choice(&format!("{p}.vestirsi"), &m.vestirsi, vocab::VESTIRSI)?;
            check_choice(&format!("{p}.autonomia_wc"), &m.autonomia_wc, vocab::AUTONOMIA_BAGNO)?;
            check_choice(
                &format!("{p}.autonomia_doccia"),
                &m.autonomia_doccia,
                vocab::AUTONOMIA_BAGNO,
            )?;
        }

        if let Some(e) = &self.eliminazione_intestinale {
            let p = format!("{P}.eliminazione_intestinale");
            check_choice(
                &format!("{p}.grado_autonomia"),
                &e.grado_autonomia,
                vocab::GRADO_AUTONOMIA_INTESTINALE,
            )?;
            check_int(
                &format!("{p}.frequenza_evacuazioni_n"),
                e.frequenza_evacuazioni_n,
                0,
                None,
            )?;
            check_choice(&format!("{p}.consistenza"), &e.consistenza, vocab::CONSISTENZA)?;
            check_choice(&format!("{p}.colore"), &e.colore, vocab::COLORE_FECI)?;
            check_choice(&format!("{p}.presidi"), &e.presidi, vocab::PRESIDI_INTESTINALE)?;
        }

        if let Some(v) = &self.eliminazione_vescicale_urinaria {
            let p = format!("{P}.eliminazione_vescicale_urinaria");
            check_choice(
                &format!("{p}.grado_autonomia"),
                &v.grado_autonomia,
                vocab::GRADO_AUTONOMIA_URINARIA,
            )?;
            check_choice(
                &format!("{p}.incontinente_tipo"),
                &v.incontinente_tipo,
                vocab::INCONTINENTE_TIPO,
            )?;
            check_choice(&format!("{p}.minzione"), &v.minzione, vocab::MINZIONE)?;
            check_int(&format!("{p}.frequenza_die"), v.frequenza_die, 0, None)?;
            check_int(&format!("{p}.diuresi_ml_24ore"), v.diuresi_ml_24ore, 0, None)?;
            check_choice(
                &format!("{p}.diuresi_regolarita"),
                &v.diuresi_regolarita,
                vocab::DIURESI_REGOLARITA,
            )?;
            check_choice(
                &format!("{p}.caratteristiche"),
                &v.caratteristiche,
                vocab::CARATTERISTICHE_URINARIE,
            )?;
            check_choice(
                &format!("{p}.presidi_urinaria"),
                &v.presidi_urinaria,
                vocab::PRESIDI_URINARIA,
            )?;
        }

        if let Some(a) = &self.alimentazione_e_idratazione {
            let p = format!("{P}.alimentazione_e_idratazione");
            check_choice(
                &format!("{p}.autonomia"),
                &a.autonomia,
                vocab::AUTONOMIA_ALIMENTAZIONE,
            )?;
            check_choice(&format!("{p}.deglutizione"), &a.deglutizione, vocab::DEGLUTIZIONE)?;
            check_options(&format!("{p}.protesi"), &a.protesi, vocab::PROTESI_DENTARIA)?;
            check_options(&format!("{p}.presidi"), &a.presidi, vocab::PRESIDI_ALIMENTAZIONE)?;
            check_choice(&format!("{p}.dieta"), &a.dieta, vocab::DIETA)?;
            check_choice(&format!("{p}.cavo_orale"), &a.cavo_orale, vocab::CAVO_ORALE)?;
            check_choice(
                &format!("{p}.stato_nutrizionale_scala_mna"),
                &a.stato_nutrizionale_scala_mna,
                vocab::STATO_NUTRIZIONALE_MNA,
            )?;
            check_int(
                &format!("{p}.variazioni_peso_ultimi_mesi"),
                a.variazioni_peso_ultimi_mesi,
                0,
                None,
            )?;
            check_float(
                &format!("{p}.variazione_peso_kg"),
                a.variazione_peso_kg,
                -500.0,
                Some(500.0),
            )?;
            check_choice(
                &format!("{p}.tipo_variazione_peso"),
                &a.tipo_variazione_peso,
                vocab::TIPO_VARIAZIONE_PESO,
            )?;
            check_float(&format!("{p}.peso_kg"), a.peso_kg, 0.0, None)?;
            check_float(&format!("{p}.altezza_mt"), a.altezza_mt, 0.0, None)?;
            check_float(&format!("{p}.imc"), a.imc, 0.0, None)?;
            check_choice(&format!("{p}.grado_obesita"), &a.grado_obesita, vocab::GRADO_OBESITA)?;
            check_options(&format!("{p}.presenza_di"), &a.presenza_di, vocab::PRESENZA_DI)?;
            check_options(&format!("{p}.addome"), &a.addome, vocab::ADDOME)?;
            check_choice(
                &format!("{p}.idratazione_stato"),
                &a.idratazione_stato,
                vocab::IDRATAZIONE_STATO,
            )?;
            check_choice(
                &format!("{p}.idratazione_autonomia"),
                &a.idratazione_autonomia,
                vocab::IDRATAZIONE_AUTONOMIA,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModuliError;
    use serde_json::json;

    #[test]
    fn parses_empty_object_as_all_absent() {
        let doc = ValutazioneInfermieristicaV1::from_json_value(json!({})).expect("empty doc");
        assert_eq!(doc, ValutazioneInfermieristicaV1::default());
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn null_sections_and_fields_are_absent() {
        let doc = ValutazioneInfermieristicaV1::from_json_value(json!({
            "utente": null,
            "paziente": { "peso_kg": null, "anno": 2025 },
            "tao": null
        }))
        .expect("parse");
        assert!(doc.utente.is_none());
        assert_eq!(doc.paziente.as_ref().and_then(|p| p.anno), Some(2025));
        assert_eq!(doc.paziente.as_ref().and_then(|p| p.peso_kg), None);
        assert_eq!(doc.tao, None);
    }

    #[test]
    fn multi_select_tolerates_non_arrays() {
        let doc = ValutazioneInfermieristicaV1::from_json_value(json!({
            "anamnesi_ed_esame_obiettivo": {
                "comunicazione": { "udito": "sordità", "vista": null, "comunicazione": ["afasia", 3] },
                "respirazione": { "dispnea_tipo": { "a": 1 } }
            }
        }))
        .expect("parse");
        let anamnesi = doc.anamnesi_ed_esame_obiettivo.expect("anamnesi");
        let com = anamnesi.comunicazione.expect("comunicazione");
        assert!(com.udito.is_empty());
        assert!(com.vista.is_empty());
        assert_eq!(com.comunicazione, vec!["afasia".to_string()]);
        assert!(anamnesi.respirazione.expect("respirazione").dispnea_tipo.is_empty());
    }

    #[test]
    fn single_select_coerces_numbers_to_strings() {
        let doc = ValutazioneInfermieristicaV1::from_json_value(json!({
            "utente": { "struttura": 3 },
            "valutazione_del_rischio": { "rischio_infezioni_ica": "" }
        }))
        .expect("parse");
        assert_eq!(doc.utente.expect("utente").struttura.as_deref(), Some("3"));
        assert_eq!(
            doc.valutazione_del_rischio.expect("rischio").rischio_infezioni_ica,
            None
        );
    }

    #[test]
    fn strict_parse_rejects_unknown_keys_with_path() {
        let err = ValutazioneInfermieristicaV1::from_json_value(json!({
            "paziente": { "peso_kg": 70.5, "colore_occhi": "verdi" }
        }))
        .expect_err("unknown key");
        match err {
            ModuliError::Translation(msg) => {
                assert!(msg.contains("paziente"));
                assert!(msg.contains("colore_occhi"));
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn strict_parse_rejects_wrong_scalar_types() {
        let err = ValutazioneInfermieristicaV1::from_json_value(json!({
            "rilievo_parametri_vitali": { "frequenza_cardiaca_b_min": "settanta" }
        }))
        .expect_err("wrong type");
        match err {
            ModuliError::Translation(msg) => {
                assert!(msg.contains("rilievo_parametri_vitali.frequenza_cardiaca_b_min"));
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(ValutazioneInfermieristicaV1::from_json_value(json!(null)).is_err());
        assert!(ValutazioneInfermieristicaV1::from_json_value(json!([1, 2])).is_err());
        assert!(ValutazioneInfermieristicaV1::from_json_value(json!("not an object")).is_err());
    }

    #[test]
    fn serialises_blank_fields_as_null_and_empty_lists() {
        let doc = ValutazioneInfermieristicaV1 {
            anamnesi_ed_esame_obiettivo: Some(AnamnesiEsameObiettivo {
                respirazione: Some(Respirazione::default()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let value = serde_json::to_value(&doc).expect("serialise");
        assert!(value["firma"].is_null());
        assert!(value["utente"].is_null());
        let resp = &value["anamnesi_ed_esame_obiettivo"]["respirazione"];
        assert_eq!(resp["dispnea_tipo"], json!([]));
        assert!(resp["tipologia"].is_null());
    }

    #[test]
    fn utente_uses_camel_case_initial_keys() {
        let doc = ValutazioneInfermieristicaV1::from_json_value(json!({
            "utente": { "inizNome": "M", "inizCognome": "R", "dossier": "abc", "struttura": "R3D" }
        }))
        .expect("parse");
        let value = serde_json::to_value(&doc).expect("serialise");
        assert_eq!(value["utente"]["inizNome"], json!("M"));
        assert_eq!(value["utente"]["inizCognome"], json!("R"));
    }

    #[test]
    fn dates_use_iso_format() {
        let doc = ValutazioneInfermieristicaV1::from_json_value(json!({ "data": "2026-03-14" }))
            .expect("parse");
        assert_eq!(doc.data, NaiveDate::from_ymd_opt(2026, 3, 14));
        assert!(ValutazioneInfermieristicaV1::from_json_value(json!({ "data": "14/03/2026" })).is_err());
    }

    #[test]
    fn validate_rejects_out_of_vocabulary_choice() {
        let doc = ValutazioneInfermieristicaV1::from_json_value(json!({
            "anamnesi_ed_esame_obiettivo": {
                "eliminazione_vescicale_urinaria": { "grado_autonomia": "sconosciuto" }
            }
        }))
        .expect("parse");
        let err = doc.validate().expect_err("invalid option");
        match err {
            ModuliError::InvalidValue { path, .. } => assert_eq!(
                path,
                "anamnesi_ed_esame_obiettivo.eliminazione_vescicale_urinaria.grado_autonomia"
            ),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_out_of_vocabulary_multi_item() {
        let doc = ValutazioneInfermieristicaV1::from_json_value(json!({
            "anamnesi_ed_esame_obiettivo": { "stato": { "tipo_dolore": ["acuto", "fantasma"] } }
        }))
        .expect("parse");
        assert!(matches!(doc.validate(), Err(ModuliError::InvalidValue { .. })));
    }

    #[test]
    fn validate_enforces_numeric_bounds() {
        let year = ValutazioneInfermieristicaV1::from_json_value(json!({ "paziente": { "anno": 1999 } }))
            .expect("parse");
        assert!(matches!(
            year.validate(),
            Err(ModuliError::InvalidValue { path, .. }) if path == "paziente.anno"
        ));

        let weight = ValutazioneInfermieristicaV1::from_json_value(json!({
            "anamnesi_ed_esame_obiettivo": {
                "alimentazione_e_idratazione": { "variazione_peso_kg": -501.0 }
            }
        }))
        .expect("parse");
        assert!(weight.validate().is_err());

        let ok = ValutazioneInfermieristicaV1::from_json_value(json!({
            "paziente": { "anno": 2026, "numero_progressivo": 1 },
            "anamnesi_ed_esame_obiettivo": {
                "alimentazione_e_idratazione": { "variazione_peso_kg": -3.5 }
            }
        }))
        .expect("parse");
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn validate_enforces_name_length() {
        let named = |name: String| ValutazioneInfermieristicaV1 {
            paziente: Some(Paziente {
                paziente_nominativo: Some(name),
                ..Default::default()
            }),
            ..Default::default()
        };

        match named("x".repeat(201)).validate() {
            Err(ModuliError::InvalidValue { path, reason }) => {
                assert_eq!(path, "paziente.paziente_nominativo");
                assert!(reason.contains("200"));
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
        assert!(named(format!("  {}  ", "à".repeat(200))).validate().is_ok());
        assert!(named("   ".to_string()).validate().is_ok());
    }
}
