//! Form controls to [`FormDocument`].
//!
//! Serialisation never fails. Blank or unparsable scalars become `None` (`null` on the wire),
//! empty checkbox groups become `[]`, and `si`/`no` groups become `true` only when `si` is
//! selected. Every section is emitted, whatever the visibility of its dependent fields.

use crate::constants::DATE_FORMAT;
use crate::controls::FormState;
use crate::fields::{
    ChoiceField as C, DateField as D, FlagField as F, FloatField as R, IntField as I,
    MultiField as M, TextField as T, ToggleField as G, YesNo,
};
use chrono::NaiveDate;
use moduli::valutazione_infermieristica::*;
use moduli::FormDocument;

/// Parse an integer the lenient way number inputs are read: surrounding whitespace is ignored and
/// the longest leading `[+-]digits` prefix is used. No digits, or overflow, yields `None`.
pub fn parse_int(input: &str) -> Option<i64> {
    let s = input.trim();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

/// Parse a decimal the way number inputs are read: the longest leading `[+-]digits[.,digits]`
/// prefix is used, with a comma accepted as decimal separator. No digits, or a non-finite result,
/// yields `None`.
pub fn parse_float(input: &str) -> Option<f64> {
    let s = input.trim();
    let bytes = s.as_bytes();
    let mut end = usize::from(s.starts_with(['+', '-']));
    let int_digits = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    end += int_digits;
    let mut frac_digits = 0;
    if matches!(bytes.get(end), Some(b'.' | b',')) {
        frac_digits = bytes[end + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    s[..end]
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

struct Reader<'a>(&'a FormState);

impl Reader<'_> {
    fn text(&self, field: T) -> Option<String> {
        let v = self.0.text(field).trim();
        (!v.is_empty()).then(|| v.to_string())
    }

    fn int(&self, field: I) -> Option<i64> {
        parse_int(self.0.number_input(field.into()))
    }

    fn float(&self, field: R) -> Option<f64> {
        parse_float(self.0.number_input(field.into()))
    }

    fn date(&self, field: D) -> Option<NaiveDate> {
        parse_date(self.0.date_input(field))
    }

    fn flag(&self, field: F) -> Option<bool> {
        Some(self.0.flag(field) == Some(YesNo::Si))
    }

    fn toggle(&self, field: G) -> Option<bool> {
        Some(self.0.toggle(field))
    }

    fn choice(&self, field: C) -> Option<String> {
        self.0.choice(field).map(str::to_string)
    }

    fn multi(&self, field: M) -> Vec<String> {
        self.0.checked(field).into_iter().map(str::to_string).collect()
    }
}

/// Build the document from the current control state.
pub fn serialize(state: &FormState) -> FormDocument {
    let r = Reader(state);

    FormDocument {
        utente: Some(Utente {
            iniz_nome: r.text(T::InizNome),
            iniz_cognome: r.text(T::InizCognome),
            dossier: r.text(T::Dossier),
            struttura: r.choice(C::Struttura),
        }),
        paziente: Some(Paziente {
            paziente_nominativo: r.text(T::PazienteNominativo),
            anno: r.int(I::Anno),
            numero_progressivo: r.int(I::NumeroProgressivo),
            peso_kg: r.float(R::PesoKg),
            altezza_mt: r.float(R::AltezzaMt),
            imc_kg_m2: r.float(R::ImcKgM2),
        }),
        rilievo_parametri_vitali: Some(RilievoParametriVitali {
            frequenza_cardiaca_b_min: r.int(I::FrequenzaCardiaca),
            temperatura_corporea_c: r.float(R::TemperaturaCorporea),
            pressione_arteriosa_mmhg: r.text(T::PressioneArteriosa),
            ecg: r.flag(F::Ecg),
            frequenza_respiratoria_atti_min: r.int(I::FrequenzaRespiratoria),
            sato2: r.float(R::Sato2),
            altro_parametri_vitali: r.text(T::AltroParametriVitali),
        }),
        modello_di_percezione_e_di_gestione_della_salute: Some(ModelloPercezioneGestioneSalute {
            consumo_tabacco: r.flag(F::ConsumoTabacco),
            quantita_tabacco_die_numero_sigarette: r.int(I::SigaretteDie),
            interrotto_consumo_tabacco: r.flag(F::InterrottoTabacco),
            data_interruzione_tabacco: r.date(D::InterruzioneTabacco),
            consumo_alcolici: r.flag(F::ConsumoAlcolici),
            quantita_alcolici_die_cl: r.int(I::AlcoliciDieCl),
            interrotto_consumo_alcolici: r.flag(F::InterrottoAlcolici),
            data_interruzione_alcolici: r.date(D::InterruzioneAlcolici),
        }),
        allergie_riferite: Some(AllergieRiferite {
            farmaci: r.text(T::AllergieFarmaci),
            alimenti: r.text(T::AllergieAlimenti),
            altro_allergie: r.text(T::AltroAllergie),
        }),
        attivita_fisiche_sportive: r.flag(F::AttivitaFisiche),
        patologie_croniche: r.flag(F::PatologieCroniche),
        quali_patologie_croniche: r.text(T::QualiPatologieCroniche),
        anamnesi_ed_esame_obiettivo: Some(anamnesi(&r)),
        tao: r.flag(F::Tao),
        ossigenoterapia: r.flag(F::Ossigenoterapia),
        farmaci_h: r.flag(F::FarmaciH),
        diagnosi_infermieristica: Some(DiagnosiInfermieristica {
            patologia_prevalente: r.text(T::PatologiaPrevalente),
            patologia_secondaria_1: r.text(T::PatologiaSecondaria1),
            patologia_secondaria_2: r.text(T::PatologiaSecondaria2),
        }),
        valutazione_bisogni_infermieristici: r.text(T::ValutazioneBisogni),
        cadenza_monitoraggio_clinico_parametri_vitali: r.text(T::CadenzaMonitoraggio),
        patologie_da_monitorare: r.text(T::PatologieDaMonitorare),
        valutazione_del_rischio: Some(ValutazioneDelRischio {
            rischio_cadute_scala_di_conley: r.choice(C::RischioCaduteScalaConley),
            rischio_infezioni_ica: r.choice(C::RischioInfezioniIca),
        }),
        scale_utilizzate: r.text(T::ScaleUtilizzate),
        data: r.date(D::DataCompilazione),
        infermiere_compilatore: r.text(T::InfermiereCompilatore),
        firma: r.text(T::Firma),
    }
}

fn anamnesi(r: &Reader<'_>) -> AnamnesiEsameObiettivo {
    AnamnesiEsameObiettivo {
        comunicazione: Some(Comunicazione {
            stato_di_coscienza: r.choice(C::StatoCoscienza),
            comunicazione: r.multi(M::Comunicazione),
            udito: r.multi(M::Udito),
            sordita_lato: r.choice(C::SorditaLato),
            protesi_udito: r.toggle(G::ProtesiUdito),
            protesi_udito_lato: r.choice(C::ProtesiUditoLato),
            vista: r.multi(M::Vista),
            protesi_vista: r.multi(M::ProtesiVista),
            condizioni_psichiche: r.multi(M::CondizioniPsichiche),
        }),
        respirazione: Some(Respirazione {
            tipologia: r.choice(C::TipologiaRespirazione),
            dispnea_tipo: r.multi(M::DispneaTipo),
            presenza_di_tosse: r.flag(F::PresenzaDiTosse),
            trattamento_o2: r.flag(F::TrattamentoO2),
            ossigenoterapia_l_min: r.float(R::OssigenoterapiaLMin),
            aspirazioni_secrezioni: r.flag(F::AspirazioniSecrezioni),
            allergie_respirazione: r.multi(M::AllergieRespirazione),
            presidi_respirazione: r.multi(M::PresidiRespirazione),
        }),
        circolazione_e_tessuti_cutanei: Some(CircolazioneTessutiCutanei {
            presidi_protesi: r.multi(M::PresidiProtesi),
            altro_presidi_protesi: r.text(T::AltroPresidiProtesi),
            cute_mucose: r.multi(M::CuteMucose),
            integrita_cutanea: r.multi(M::IntegritaCutanea),
            presenza_lesioni_da_decubito_sede: r.text(T::SedeLesioniDecubito),
            stadio_lesioni_da_decubito: r.choice(C::StadioLesioni),
            rischio_lesioni_scala_braden: r.choice(C::RischioBraden),
        }),
        stato: Some(Stato {
            escursione_articolare: r.choice(C::EscursioneArticolare),
            altro_escursione_articolare: r.text(T::AltroEscursioneArticolare),
            presa_delle_mani: r.choice(C::PresaMani),
            debolezza_mani_lato: r.choice(C::DebolezzaManiLato),
            paralisi_mani_lato: r.choice(C::ParalisiManiLato),
            presa_arti_inferiori: r.choice(C::PresaArtiInferiori),
            debolezza_arti_inferiori_lato: r.choice(C::DebolezzaArtiInferioriLato),
            paralisi_arti_inferiori_lato: r.choice(C::ParalisiArtiInferioriLato),
            depressione: r.toggle(G::Depressione),
            ansia: r.choice(C::Ansia),
            agitazione: r.toggle(G::Agitazione),
            riposo_sonno: r.multi(M::RiposoSonno),
            tipo_dolore: r.multi(M::TipoDolore),
            sede_dolore_acuto: r.text(T::SedeDoloreAcuto),
            sede_dolore_cronico: r.text(T::SedeDoloreCronico),
            caratteristiche_dolore: r.multi(M::CaratteristicheDolore),
            terapia_antidolorifica: r.multi(M::TerapiaAntidolorifica),
        }),
        movimento_igiene: Some(MovimentoIgiene {
            autonomia_movimento: r.choice(C::AutonomiaMovimento),
            rischio_cadute_conley: r.choice(C::RischioCaduteConley),
            ausili_presidi_movimento: r.multi(M::AusiliPresidiMovimento),
            autonomia_postura: r.choice(C::AutonomiaPostura),
            postura_obbligata_causa: r.multi(M::PosturaObbligataCausa),
            ausili_presidi_postura: r.multi(M::AusiliPresidiPostura),
            altro_ausili_presidi_postura: r.text(T::AltroAusiliPresidiPostura),
            lavarsi: r.choice(C::Lavarsi),
            vestirsi: r.choice(C::Vestirsi),
            autonomia_wc: r.choice(C::AutonomiaWc),
            altro_uso_wc: r.text(T::AltroUsoWc),
            autonomia_doccia: r.choice(C::AutonomiaDoccia),
        }),
        eliminazione_intestinale: Some(EliminazioneIntestinale {
            grado_autonomia: r.choice(C::GradoAutonomiaIntestinale),
            frequenza_evacuazioni_n: r.int(I::FrequenzaEvacuazioni),
            data_utlima_evacuazione: r.text(T::DataUltimaEvacuazione),
            consistenza: r.choice(C::Consistenza),
            colore: r.choice(C::ColoreFeci),
            presidi: r.choice(C::PresidiIntestinale),
        }),
        eliminazione_vescicale_urinaria: Some(EliminazioneVescicaleUrinaria {
            grado_autonomia: r.choice(C::GradoAutonomiaUrinaria),
            incontinente_tipo: r.choice(C::IncontinenteTipo),
            minzione: r.choice(C::Minzione),
            frequenza_die: r.int(I::FrequenzaMinzioniDie),
            diuresi_ml_24ore: r.int(I::Diuresi24h),
            diuresi_regolarita: r.choice(C::DiuresiRegolarita),
            caratteristiche: r.choice(C::CaratteristicheUrinarie),
            presidi_urinaria: r.choice(C::PresidiUrinaria),
            stomia_tipo: r.text(T::StomiaTipo),
            infezioni_urinarie: r.flag(F::InfezioniUrinarie),
            se_si_specificare_segni_e_sintomi: r.text(T::SegniSintomiInfezione),
        }),
        alimentazione_e_idratazione: Some(AlimentazioneIdratazione {
            autonomia: r.choice(C::AutonomiaAlimentazione),
            deglutizione: r.choice(C::Deglutizione),
            protesi: r.multi(M::ProtesiAlimentazione),
            presidi: r.multi(M::PresidiAlimentazione),
            altro_presidi: r.text(T::AltroPresidiAlimentazione),
            dieta: r.choice(C::Dieta),
            dieta_speciale_specifica: r.text(T::DietaSpecialeSpecifica),
            restrizioni_dietetiche: r.text(T::RestrizioniDietetiche),
            intolleranze: r.text(T::Intolleranze),
            allergie: r.text(T::AllergieAlimentazione),
            cavo_orale: r.choice(C::CavoOrale),
            altro_cavo_orale: r.text(T::AltroCavoOrale),
            stato_nutrizionale_scala_mna: r.choice(C::StatoNutrizionaleMna),
            variazioni_peso_ultimi_mesi: r.int(I::MesiVariazionePeso),
            variazione_peso_kg: r.float(R::VariazionePesoKg),
            tipo_variazione_peso: r.choice(C::TipoVariazionePeso),
            peso_kg: r.float(R::PesoKgAlimentazione),
            altezza_mt: r.float(R::AltezzaMtAlimentazione),
            imc: r.float(R::ImcAlimentazione),
            grado_obesita: r.choice(C::GradoObesita),
            presenza_di: r.multi(M::PresenzaDi),
            addome: r.multi(M::Addome),
            idratazione_stato: r.choice(C::IdratazioneStato),
            idratazione_autonomia: r.choice(C::IdratazioneAutonomia),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldKey, YesNo};
    use serde_json::{json, Value};

    #[test]
    fn parse_int_uses_leading_digits() {
        assert_eq!(parse_int("72"), Some(72));
        assert_eq!(parse_int(" 72 bpm"), Some(72));
        assert_eq!(parse_int("-3"), Some(-3));
        assert_eq!(parse_int("+4"), Some(4));
        assert_eq!(parse_int("12.9"), Some(12));
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("99999999999999999999"), None);
    }

    #[test]
    fn parse_float_accepts_comma_and_rejects_non_finite() {
        assert_eq!(parse_float("72.5"), Some(72.5));
        assert_eq!(parse_float("1,68"), Some(1.68));
        assert_eq!(parse_float(" 36 "), Some(36.0));
        assert_eq!(parse_float("36.8 C"), Some(36.8));
        assert_eq!(parse_float("72,5 kg"), Some(72.5));
        assert_eq!(parse_float("-1,5kg"), Some(-1.5));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("80."), Some(80.0));
        assert_eq!(parse_float("1.2.3"), Some(1.2));
        assert_eq!(parse_float("kg 70"), None);
        assert_eq!(parse_float("-"), None);
        assert_eq!(parse_float(&"9".repeat(400)), None);
        assert_eq!(parse_float("NaN"), None);
        assert_eq!(parse_float("inf"), None);
        assert_eq!(parse_float("sessanta"), None);
        assert_eq!(parse_float(""), None);
    }

    #[test]
    fn blank_form_serialises_to_nulls_and_empty_lists() {
        let doc = serialize(&FormState::new());
        let value = serde_json::to_value(&doc).expect("serialise");

        assert!(value["firma"].is_null());
        assert!(value["data"].is_null());
        assert!(value["utente"]["struttura"].is_null());
        assert!(value["paziente"]["anno"].is_null());
        assert_eq!(value["tao"], json!(false));
        assert_eq!(value["patologie_croniche"], json!(false));

        let anamnesi = &value["anamnesi_ed_esame_obiettivo"];
        assert_eq!(anamnesi["comunicazione"]["udito"], json!([]));
        assert_eq!(anamnesi["comunicazione"]["protesi_udito"], json!(false));
        assert!(anamnesi["respirazione"]["tipologia"].is_null());
        assert_eq!(anamnesi["stato"]["tipo_dolore"], json!([]));

        // No key is ever missing and no number is NaN.
        fn walk(v: &Value) {
            match v {
                Value::Object(map) => map.values().for_each(walk),
                Value::Array(items) => items.iter().for_each(walk),
                Value::Number(n) => assert!(n.as_f64().is_some_and(f64::is_finite)),
                _ => {}
            }
        }
        walk(&value);
    }

    #[test]
    fn flag_and_choice_are_distinct_kinds() {
        let mut state = FormState::new();
        let blank = serialize(&state);
        assert_eq!(
            blank.rilievo_parametri_vitali.as_ref().and_then(|s| s.ecg),
            Some(false)
        );
        assert_eq!(
            blank.utente.as_ref().and_then(|u| u.struttura.clone()),
            None
        );

        state.set_flag(F::Ecg, Some(YesNo::Si)).expect("flag");
        state.select(C::Struttura, Some("R3")).expect("choice");
        let doc = serialize(&state);
        assert_eq!(doc.rilievo_parametri_vitali.and_then(|s| s.ecg), Some(true));
        assert_eq!(doc.utente.and_then(|u| u.struttura).as_deref(), Some("R3"));

        state.set_flag(F::Ecg, Some(YesNo::No)).expect("flag");
        let doc = serialize(&state);
        assert_eq!(doc.rilievo_parametri_vitali.and_then(|s| s.ecg), Some(false));
    }

    #[test]
    fn text_is_trimmed_and_numbers_are_lenient() {
        let mut state = FormState::new();
        state.set_text(T::Firma, "  M. Rossi  ").expect("text");
        state.set_text(T::AltroAllergie, "   ").expect("text");
        state.set_number(I::FrequenzaCardiaca.into(), "80 bpm").expect("int");
        state.set_number(R::PesoKg.into(), "72,5").expect("float");
        state.set_number(R::Sato2.into(), "alta").expect("float");
        state.set_date(D::DataCompilazione, "14/03/2026").expect("date");

        let doc = serialize(&state);
        assert_eq!(doc.firma.as_deref(), Some("M. Rossi"));
        assert_eq!(doc.allergie_riferite.and_then(|a| a.altro_allergie), None);
        let vitali = doc.rilievo_parametri_vitali.expect("vitali");
        assert_eq!(vitali.frequenza_cardiaca_b_min, Some(80));
        assert_eq!(vitali.sato2, None);
        assert_eq!(doc.paziente.and_then(|p| p.peso_kg), Some(72.5));
        assert_eq!(doc.data, None);
    }

    #[test]
    fn hidden_dependent_values_are_still_captured() {
        let mut state = FormState::new();
        state.select(C::TipologiaRespirazione, Some("normale")).expect("select");
        state.check(M::DispneaTipo, "a riposo", true).expect("check");
        let doc = serialize(&state);
        let resp = doc
            .anamnesi_ed_esame_obiettivo
            .and_then(|a| a.respirazione)
            .expect("respirazione");
        assert_eq!(resp.dispnea_tipo, vec!["a riposo".to_string()]);
    }

    #[test]
    fn control_ids_map_to_renamed_wire_keys() {
        let mut state = FormState::new();
        let inputs = json!({
            "presa_mani": "paralisi",
            "colore_intestinale": "melena",
            "allergie_alimentazione": "arachidi",
            "peso_kg_alimentazione": 64
        });
        state
            .apply_inputs(inputs.as_object().expect("object"))
            .expect("apply");
        let value = serde_json::to_value(serialize(&state)).expect("serialise");
        let anamnesi = &value["anamnesi_ed_esame_obiettivo"];
        assert_eq!(anamnesi["stato"]["presa_delle_mani"], json!("paralisi"));
        assert_eq!(anamnesi["eliminazione_intestinale"]["colore"], json!("melena"));
        assert_eq!(anamnesi["alimentazione_e_idratazione"]["allergie"], json!("arachidi"));
        assert_eq!(anamnesi["alimentazione_e_idratazione"]["peso_kg"], json!(64.0));
        assert!(value["paziente"]["peso_kg"].is_null());
        assert!(FieldKey::from_control_id("presa_delle_mani").is_none());
    }
}
