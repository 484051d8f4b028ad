//! [`FormDocument`] to form controls.
//!
//! The populator first returns every control to its unset state, so applying the same document
//! twice leaves the same state. Absent values leave controls unset; stored booleans select `si` or
//! `no`; option values select the matching option or nothing.

use crate::constants::DATE_FORMAT;
use crate::controls::FormState;
use crate::fields::{
    ChoiceField as C, DateField as D, FlagField as F, FloatField as R, IntField as I,
    MultiField as M, TextField as T, ToggleField as G, YesNo,
};
use chrono::NaiveDate;
use moduli::valutazione_infermieristica::AnamnesiEsameObiettivo;
use moduli::FormDocument;

struct Writer<'a>(&'a mut FormState);

impl Writer<'_> {
    fn text(&mut self, field: T, value: &Option<String>) {
        self.0.put_text(field, value.as_deref());
    }

    fn int(&mut self, field: I, value: Option<i64>) {
        if let Some(v) = value {
            self.0.put_int_input(field, &v.to_string());
        }
    }

    fn float(&mut self, field: R, value: Option<f64>) {
        if let Some(v) = value {
            self.0.put_float_input(field, &v.to_string());
        }
    }

    fn date(&mut self, field: D, value: Option<NaiveDate>) {
        if let Some(v) = value {
            self.0.put_date_input(field, &v.format(DATE_FORMAT).to_string());
        }
    }

    fn flag(&mut self, field: F, value: Option<bool>) {
        self.0.put_flag(field, value.map(YesNo::from_bool));
    }

    fn toggle(&mut self, field: G, value: Option<bool>) {
        self.0.put_toggle(field, value.unwrap_or(false));
    }

    fn choice(&mut self, field: C, value: &Option<String>) {
        if !self.0.put_choice(field, value.as_deref()) {
            if let Some(v) = value {
                tracing::debug!(control = field.id(), value = %v, "stored option not in vocabulary");
            }
        }
    }

    fn multi(&mut self, field: M, values: &[String]) {
        self.0.put_checked(field, values);
    }
}

/// Set every control to reflect `doc`.
///
/// Works on disabled (view mode) state as well; this is the only write path into it.
pub fn populate(state: &mut FormState, doc: &FormDocument) {
    state.clear_values();
    let mut w = Writer(state);

    if let Some(u) = &doc.utente {
        w.text(T::InizNome, &u.iniz_nome);
        w.text(T::InizCognome, &u.iniz_cognome);
        w.text(T::Dossier, &u.dossier);
        w.choice(C::Struttura, &u.struttura);
    }

    if let Some(p) = &doc.paziente {
        w.text(T::PazienteNominativo, &p.paziente_nominativo);
        w.int(I::Anno, p.anno);
        w.int(I::NumeroProgressivo, p.numero_progressivo);
        w.float(R::PesoKg, p.peso_kg);
        w.float(R::AltezzaMt, p.altezza_mt);
        w.float(R::ImcKgM2, p.imc_kg_m2);
    }

    if let Some(v) = &doc.rilievo_parametri_vitali {
        w.int(I::FrequenzaCardiaca, v.frequenza_cardiaca_b_min);
        w.float(R::TemperaturaCorporea, v.temperatura_corporea_c);
        w.text(T::PressioneArteriosa, &v.pressione_arteriosa_mmhg);
        w.flag(F::Ecg, v.ecg);
        w.int(I::FrequenzaRespiratoria, v.frequenza_respiratoria_atti_min);
        w.float(R::Sato2, v.sato2);
        w.text(T::AltroParametriVitali, &v.altro_parametri_vitali);
    }

    if let Some(m) = &doc.modello_di_percezione_e_di_gestione_della_salute {
        w.flag(F::ConsumoTabacco, m.consumo_tabacco);
        w.int(I::SigaretteDie, m.quantita_tabacco_die_numero_sigarette);
        w.flag(F::InterrottoTabacco, m.interrotto_consumo_tabacco);
        w.date(D::InterruzioneTabacco, m.data_interruzione_tabacco);
        w.flag(F::ConsumoAlcolici, m.consumo_alcolici);
        w.int(I::AlcoliciDieCl, m.quantita_alcolici_die_cl);
        w.flag(F::InterrottoAlcolici, m.interrotto_consumo_alcolici);
        w.date(D::InterruzioneAlcolici, m.data_interruzione_alcolici);
    }

    if let Some(a) = &doc.allergie_riferite {
        w.text(T::AllergieFarmaci, &a.farmaci);
        w.text(T::AllergieAlimenti, &a.alimenti);
        w.text(T::AltroAllergie, &a.altro_allergie);
    }

    w.flag(F::AttivitaFisiche, doc.attivita_fisiche_sportive);
    w.flag(F::PatologieCroniche, doc.patologie_croniche);
    w.text(T::QualiPatologieCroniche, &doc.quali_patologie_croniche);

    if let Some(a) = &doc.anamnesi_ed_esame_obiettivo {
        anamnesi(&mut w, a);
    }

    w.flag(F::Tao, doc.tao);
    w.flag(F::Ossigenoterapia, doc.ossigenoterapia);
    w.flag(F::FarmaciH, doc.farmaci_h);

    if let Some(d) = &doc.diagnosi_infermieristica {
        w.text(T::PatologiaPrevalente, &d.patologia_prevalente);
        w.text(T::PatologiaSecondaria1, &d.patologia_secondaria_1);
        w.text(T::PatologiaSecondaria2, &d.patologia_secondaria_2);
    }

    w.text(T::ValutazioneBisogni, &doc.valutazione_bisogni_infermieristici);
    w.text(
        T::CadenzaMonitoraggio,
        &doc.cadenza_monitoraggio_clinico_parametri_vitali,
    );
    w.text(T::PatologieDaMonitorare, &doc.patologie_da_monitorare);

    if let Some(r) = &doc.valutazione_del_rischio {
        w.choice(C::RischioCaduteScalaConley, &r.rischio_cadute_scala_di_conley);
        w.choice(C::RischioInfezioniIca, &r.rischio_infezioni_ica);
    }

    w.text(T::ScaleUtilizzate, &doc.scale_utilizzate);
    w.date(D::DataCompilazione, doc.data);
    w.text(T::InfermiereCompilatore, &doc.infermiere_compilatore);
    w.text(T::Firma, &doc.firma);

    tracing::debug!("form populated from stored document");
}

fn anamnesi(w: &mut Writer<'_>, a: &AnamnesiEsameObiettivo) {
    if let Some(c) = &a.comunicazione {
        w.choice(C::StatoCoscienza, &c.stato_di_coscienza);
        w.multi(M::Comunicazione, &c.comunicazione);
        w.multi(M::Udito, &c.udito);
        w.choice(C::SorditaLato, &c.sordita_lato);
        w.toggle(G::ProtesiUdito, c.protesi_udito);
        w.choice(C::ProtesiUditoLato, &c.protesi_udito_lato);
        w.multi(M::Vista, &c.vista);
        w.multi(M::ProtesiVista, &c.protesi_vista);
        w.multi(M::CondizioniPsichiche, &c.condizioni_psichiche);
    }

    if let Some(r) = &a.respirazione {
        w.choice(C::TipologiaRespirazione, &r.tipologia);
        w.multi(M::DispneaTipo, &r.dispnea_tipo);
        w.flag(F::PresenzaDiTosse, r.presenza_di_tosse);
        w.flag(F::TrattamentoO2, r.trattamento_o2);
        w.float(R::OssigenoterapiaLMin, r.ossigenoterapia_l_min);
        w.flag(F::AspirazioniSecrezioni, r.aspirazioni_secrezioni);
        w.multi(M::AllergieRespirazione, &r.allergie_respirazione);
        w.multi(M::PresidiRespirazione, &r.presidi_respirazione);
    }

    if let Some(c) = &a.circolazione_e_tessuti_cutanei {
        w.multi(M::PresidiProtesi, &c.presidi_protesi);
        w.text(T::AltroPresidiProtesi, &c.altro_presidi_protesi);
        w.multi(M::CuteMucose, &c.cute_mucose);
        w.multi(M::IntegritaCutanea, &c.integrita_cutanea);
        w.text(T::SedeLesioniDecubito, &c.presenza_lesioni_da_decubito_sede);
        w.choice(C::StadioLesioni, &c.stadio_lesioni_da_decubito);
        w.choice(C::RischioBraden, &c.rischio_lesioni_scala_braden);
    }

    if let Some(s) = &a.stato {
        w.choice(C::EscursioneArticolare, &s.escursione_articolare);
        w.text(T::AltroEscursioneArticolare, &s.altro_escursione_articolare);
        w.choice(C::PresaMani, &s.presa_delle_mani);
        w.choice(C::DebolezzaManiLato, &s.debolezza_mani_lato);
        w.choice(C::ParalisiManiLato, &s.paralisi_mani_lato);
        w.choice(C::PresaArtiInferiori, &s.presa_arti_inferiori);
        w.choice(C::DebolezzaArtiInferioriLato, &s.debolezza_arti_inferiori_lato);
        w.choice(C::ParalisiArtiInferioriLato, &s.paralisi_arti_inferiori_lato);
        w.toggle(G::Depressione, s.depressione);
        w.choice(C::Ansia, &s.ansia);
        w.toggle(G::Agitazione, s.agitazione);
        w.multi(M::RiposoSonno, &s.riposo_sonno);
        w.multi(M::TipoDolore, &s.tipo_dolore);
        w.text(T::SedeDoloreAcuto, &s.sede_dolore_acuto);
        w.text(T::SedeDoloreCronico, &s.sede_dolore_cronico);
        w.multi(M::CaratteristicheDolore, &s.caratteristiche_dolore);
        w.multi(M::TerapiaAntidolorifica, &s.terapia_antidolorifica);
    }

    if let Some(m) = &a.movimento_igiene {
        w.choice(C::AutonomiaMovimento, &m.autonomia_movimento);
        w.choice(C::RischioCaduteConley, &m.rischio_cadute_conley);
        w.multi(M::AusiliPresidiMovimento, &m.ausili_presidi_movimento);
        w.choice(C::AutonomiaPostura, &m.autonomia_postura);
        w.multi(M::PosturaObbligataCausa, &m.postura_obbligata_causa);
        w.multi(M::AusiliPresidiPostura, &m.ausili_presidi_postura);
        w.text(T::AltroAusiliPresidiPostura, &m.altro_ausili_presidi_postura);
        w.choice(C::Lavarsi, &m.lavarsi);
        w.choice(C::Vestirsi, &m.vestirsi);
        w.choice(C::AutonomiaWc, &m.autonomia_wc);
        w.text(T::AltroUsoWc, &m.altro_uso_wc);
        w.choice(C::AutonomiaDoccia, &m.autonomia_doccia);
    }

    if let Some(e) = &a.eliminazione_intestinale {
        w.choice(C::GradoAutonomiaIntestinale, &e.grado_autonomia);
        w.int(I::FrequenzaEvacuazioni, e.frequenza_evacuazioni_n);
        w.text(T::DataUltimaEvacuazione, &e.data_utlima_evacuazione);
        w.choice(C::Consistenza, &e.consistenza);
        w.choice(C::ColoreFeci, &e.colore);
        w.choice(C::PresidiIntestinale, &e.presidi);
    }

    if let Some(v) = &a.eliminazione_vescicale_urinaria {
        w.choice(C::GradoAutonomiaUrinaria, &v.grado_autonomia);
        w.choice(C::IncontinenteTipo, &v.incontinente_tipo);
        w.choice(C::Minzione, &v.minzione);
        w.int(I::FrequenzaMinzioniDie, v.frequenza_die);
        w.int(I::Diuresi24h, v.diuresi_ml_24ore);
        w.choice(C::DiuresiRegolarita, &v.diuresi_regolarita);
        w.choice(C::CaratteristicheUrinarie, &v.caratteristiche);
        w.choice(C::PresidiUrinaria, &v.presidi_urinaria);
        w.text(T::StomiaTipo, &v.stomia_tipo);
        w.flag(F::InfezioniUrinarie, v.infezioni_urinarie);
        w.text(T::SegniSintomiInfezione, &v.se_si_specificare_segni_e_sintomi);
    }

    if let Some(a) = &a.alimentazione_e_idratazione {
        w.choice(C::AutonomiaAlimentazione, &a.autonomia);
        w.choice(C::Deglutizione, &a.deglutizione);
        w.multi(M::ProtesiAlimentazione, &a.protesi);
        w.multi(M::PresidiAlimentazione, &a.presidi);
        w.text(T::AltroPresidiAlimentazione, &a.altro_presidi);
        w.choice(C::Dieta, &a.dieta);
        w.text(T::DietaSpecialeSpecifica, &a.dieta_speciale_specifica);
        w.text(T::RestrizioniDietetiche, &a.restrizioni_dietetiche);
        w.text(T::Intolleranze, &a.intolleranze);
        w.text(T::AllergieAlimentazione, &a.allergie);
        w.choice(C::CavoOrale, &a.cavo_orale);
        w.text(T::AltroCavoOrale, &a.altro_cavo_orale);
        w.choice(C::StatoNutrizionaleMna, &a.stato_nutrizionale_scala_mna);
        w.int(I::MesiVariazionePeso, a.variazioni_peso_ultimi_mesi);
        w.float(R::VariazionePesoKg, a.variazione_peso_kg);
        w.choice(C::TipoVariazionePeso, &a.tipo_variazione_peso);
        w.float(R::PesoKgAlimentazione, a.peso_kg);
        w.float(R::AltezzaMtAlimentazione, a.altezza_mt);
        w.float(R::ImcAlimentazione, a.imc);
        w.choice(C::GradoObesita, &a.grado_obesita);
        w.multi(M::PresenzaDi, &a.presenza_di);
        w.multi(M::Addome, &a.addome);
        w.choice(C::IdratazioneStato, &a.idratazione_stato);
        w.choice(C::IdratazioneAutonomia, &a.idratazione_autonomia);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::serialize;
    use serde_json::json;

    fn filled_state() -> FormState {
        let mut state = FormState::new();
        let inputs = json!({
            "inizNome": "M",
            "inizCognome": "R",
            "dossier": "0e9b1f4a-2a7d-4d44-8c7e-2f0d5c4b9a10",
            "struttura": "R3D",
            "paziente_nominativo": "Anna Bianchi",
            "anno": "2026",
            "numero_progressivo": "1",
            "peso_kg": "61,5",
            "altezza_mt": "1.62",
            "temperatura_corporea_c": "36.8",
            "ecg": "no",
            "consumo_tabacco": "si",
            "data_interruzione_tabacco": "2020-01-31",
            "patologie_croniche": "si",
            "quali_patologie_croniche": "diabete",
            "udito": ["ipoacusia", "sordità"],
            "sordita_lato": "dx",
            "protesi_udito": true,
            "protesi_udito_lato": "sn",
            "tipologia_respirazione": "dispnea",
            "dispnea_tipo": ["da sforzo"],
            "presa_mani": "debolezza",
            "debolezza_mani_lato": "dx",
            "tipo_dolore": ["acuto", "cronico"],
            "sede_dolore_acuto": "ginocchio",
            "depressione": true,
            "grado_autonomia_urinaria": "incontinente",
            "incontinente_tipo": "urgenza",
            "diuresi_ml_24ore": "1500",
            "presenza_di": ["nausea", "vomito"],
            "imc": "23.4",
            "rischio_infezioni_ica": "medio",
            "data": "2026-03-14",
            "infermiere_compilatore": "Mario Rossi",
            "firma": "M. Rossi"
        });
        state
            .apply_inputs(inputs.as_object().expect("object"))
            .expect("apply");
        state
    }

    #[test]
    fn round_trip_reproduces_document() {
        let original = serialize(&filled_state());
        let mut fresh = FormState::new();
        populate(&mut fresh, &original);
        assert_eq!(serialize(&fresh), original);
    }

    #[test]
    fn round_trip_of_blank_form() {
        let original = serialize(&FormState::new());
        let mut fresh = FormState::new();
        populate(&mut fresh, &original);
        assert_eq!(serialize(&fresh), original);
    }

    #[test]
    fn populate_is_idempotent_and_resets_previous_values() {
        let doc = serialize(&filled_state());
        let mut state = FormState::new();
        state.put_text(T::AltroUsoWc, Some("leftover"));
        populate(&mut state, &doc);
        let once = state.clone();
        populate(&mut state, &doc);
        assert_eq!(state, once);
        assert_eq!(state.text(T::AltroUsoWc), "");
    }

    #[test]
    fn booleans_map_back_to_si_no() {
        let doc = FormDocument {
            patologie_croniche: Some(true),
            tao: Some(false),
            farmaci_h: None,
            ..Default::default()
        };
        let mut state = FormState::new();
        populate(&mut state, &doc);
        assert_eq!(state.flag(F::PatologieCroniche), Some(YesNo::Si));
        assert_eq!(state.flag(F::Tao), Some(YesNo::No));
        assert_eq!(state.flag(F::FarmaciH), None);
    }

    #[test]
    fn lenient_stored_values_populate_without_error() {
        let doc = FormDocument::from_json_value(json!({
            "utente": { "struttura": "R3" },
            "anamnesi_ed_esame_obiettivo": {
                "comunicazione": { "udito": "sordità", "vista": ["normovedente", 7] },
                "stato": { "presa_delle_mani": 42 },
                "eliminazione_vescicale_urinaria": { "grado_autonomia": null }
            }
        }))
        .expect("lenient parse");

        let mut state = FormState::new();
        populate(&mut state, &doc);
        assert_eq!(state.choice(C::Struttura), Some("R3"));
        assert!(state.checked(M::Udito).is_empty());
        assert_eq!(state.checked(M::Vista), vec!["normovedente"]);
        assert_eq!(state.choice(C::PresaMani), None);
        assert_eq!(state.choice(C::GradoAutonomiaUrinaria), None);
    }

    #[test]
    fn populates_disabled_state() {
        let doc = FormDocument {
            firma: Some("M. Rossi".into()),
            ..Default::default()
        };
        let mut state = FormState::new();
        state.disable();
        populate(&mut state, &doc);
        assert!(state.is_disabled());
        assert_eq!(state.text(T::Firma), "M. Rossi");
    }
}
