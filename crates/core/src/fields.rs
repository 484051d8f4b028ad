//! Typed field registry of the nursing evaluation form.
//!
//! Every form control is a variant of one enum per field kind. A variant carries the control
//! identifier (the historical form-control name, which can differ from the stored key), the
//! section it is rendered in and, for option groups, its vocabulary. Accessors on
//! [`FormState`](crate::FormState) take the enum of the matching kind, so reading a control as the
//! wrong kind does not compile.

use moduli::vocabulary as vocab;

/// Form sections in rendering order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Utente,
    Paziente,
    ParametriVitali,
    PercezioneSalute,
    Allergie,
    StoriaClinica,
    Comunicazione,
    Respirazione,
    Circolazione,
    Stato,
    MovimentoIgiene,
    EliminazioneIntestinale,
    EliminazioneUrinaria,
    Alimentazione,
    Terapie,
    Diagnosi,
    Bisogni,
    Rischio,
    Firma,
}

impl Section {
    pub const ALL: &'static [Section] = &[
        Section::Utente,
        Section::Paziente,
        Section::ParametriVitali,
        Section::PercezioneSalute,
        Section::Allergie,
        Section::StoriaClinica,
        Section::Comunicazione,
        Section::Respirazione,
        Section::Circolazione,
        Section::Stato,
        Section::MovimentoIgiene,
        Section::EliminazioneIntestinale,
        Section::EliminazioneUrinaria,
        Section::Alimentazione,
        Section::Terapie,
        Section::Diagnosi,
        Section::Bisogni,
        Section::Rischio,
        Section::Firma,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Utente => "Utente",
            Section::Paziente => "Paziente",
            Section::ParametriVitali => "Rilievo parametri vitali",
            Section::PercezioneSalute => "Modello di percezione e di gestione della salute",
            Section::Allergie => "Allergie riferite",
            Section::StoriaClinica => "Attività e patologie croniche",
            Section::Comunicazione => "Comunicazione",
            Section::Respirazione => "Respirazione",
            Section::Circolazione => "Circolazione e tessuti cutanei",
            Section::Stato => "Stato",
            Section::MovimentoIgiene => "Movimento e igiene",
            Section::EliminazioneIntestinale => "Eliminazione intestinale",
            Section::EliminazioneUrinaria => "Eliminazione vescicale urinaria",
            Section::Alimentazione => "Alimentazione e idratazione",
            Section::Terapie => "Terapie",
            Section::Diagnosi => "Diagnosi infermieristica",
            Section::Bisogni => "Valutazione dei bisogni",
            Section::Rischio => "Valutazione del rischio",
            Section::Firma => "Compilazione",
        }
    }

    /// Fields rendered in this section.
    pub fn fields(self) -> impl Iterator<Item = FieldKey> {
        FieldKey::all().filter(move |f| f.section() == self)
    }
}

macro_rules! field_kind {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($id:literal, $section:ident)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Control identifier.
            pub fn id(self) -> &'static str {
                match self {
                    $($name::$variant => $id),+
                }
            }

            pub fn section(self) -> Section {
                match self {
                    $($name::$variant => Section::$section),+
                }
            }
        }
    };
}

macro_rules! option_kind {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($id:literal, $section:ident, $vocab:ident)),+ $(,)?
        }
    ) => {
        field_kind! {
            $(#[$meta])*
            $name {
                $($variant => ($id, $section)),+
            }
        }

        impl $name {
            /// Option identifiers in rendering order.
            pub fn options(self) -> &'static [&'static str] {
                match self {
                    $($name::$variant => vocab::$vocab),+
                }
            }

            /// Resolve a value to the vocabulary's own identifier, if it is one.
            pub fn option(self, value: &str) -> Option<&'static str> {
                self.options().iter().copied().find(|o| *o == value)
            }
        }
    };
}

field_kind! {
    /// Free-text controls.
    TextField {
        InizNome => ("inizNome", Utente),
        InizCognome => ("inizCognome", Utente),
        Dossier => ("dossier", Utente),
        PazienteNominativo => ("paziente_nominativo", Paziente),
        PressioneArteriosa => ("pressione_arteriosa_mmhg", ParametriVitali),
        AltroParametriVitali => ("altro_parametri_vitali", ParametriVitali),
        AllergieFarmaci => ("allergie_farmaci", Allergie),
        AllergieAlimenti => ("allergie_alimenti", Allergie),
        AltroAllergie => ("altro_allergie", Allergie),
        QualiPatologieCroniche => ("quali_patologie_croniche", StoriaClinica),
        AltroPresidiProtesi => ("altro_presidi_protesi", Circolazione),
        SedeLesioniDecubito => ("presenza_lesioni_da_decubito_sede", Circolazione),
        AltroEscursioneArticolare => ("altro_escursione_articolare", Stato),
        SedeDoloreAcuto => ("sede_dolore_acuto", Stato),
        SedeDoloreCronico => ("sede_dolore_cronico", Stato),
        AltroAusiliPresidiPostura => ("altro_ausili_presidi_postura", MovimentoIgiene),
        AltroUsoWc => ("altro_uso_wc", MovimentoIgiene),
        DataUltimaEvacuazione => ("data_utlima_evacuazione", EliminazioneIntestinale),
        StomiaTipo => ("stomia_tipo", EliminazioneUrinaria),
        SegniSintomiInfezione => ("se_si_specificare_segni_e_sintomi", EliminazioneUrinaria),
        AltroPresidiAlimentazione => ("altro_presidi_alimentazione", Alimentazione),
        DietaSpecialeSpecifica => ("dieta_speciale_specifica", Alimentazione),
        RestrizioniDietetiche => ("restrizioni_dietetiche", Alimentazione),
        Intolleranze => ("intolleranze", Alimentazione),
        AllergieAlimentazione => ("allergie_alimentazione", Alimentazione),
        AltroCavoOrale => ("altro_cavo_orale", Alimentazione),
        PatologiaPrevalente => ("patologia_prevalente", Diagnosi),
        PatologiaSecondaria1 => ("patologia_secondaria_1", Diagnosi),
        PatologiaSecondaria2 => ("patologia_secondaria_2", Diagnosi),
        ValutazioneBisogni => ("valutazione_bisogni_infermieristici", Bisogni),
        CadenzaMonitoraggio => ("cadenza_monitoraggio_clinico_parametri_vitali", Bisogni),
        PatologieDaMonitorare => ("patologie_da_monitorare", Bisogni),
        ScaleUtilizzate => ("scale_utilizzate", Rischio),
        InfermiereCompilatore => ("infermiere_compilatore", Firma),
        Firma => ("firma", Firma),
    }
}

field_kind! {
    /// Integer inputs.
    IntField {
        Anno => ("anno", Paziente),
        NumeroProgressivo => ("numero_progressivo", Paziente),
        FrequenzaCardiaca => ("frequenza_cardiaca_b_min", ParametriVitali),
        FrequenzaRespiratoria => ("frequenza_respiratoria_atti_min", ParametriVitali),
        SigaretteDie => ("quantita_tabacco_die_numero_sigarette", PercezioneSalute),
        AlcoliciDieCl => ("quantita_alcolici_die_cl", PercezioneSalute),
        FrequenzaEvacuazioni => ("frequenza_evacuazioni_n", EliminazioneIntestinale),
        FrequenzaMinzioniDie => ("frequenza_die", EliminazioneUrinaria),
        Diuresi24h => ("diuresi_ml_24ore", EliminazioneUrinaria),
        MesiVariazionePeso => ("variazioni_peso_ultimi_mesi", Alimentazione),
    }
}

field_kind! {
    /// Decimal inputs.
    FloatField {
        PesoKg => ("peso_kg", Paziente),
        AltezzaMt => ("altezza_mt", Paziente),
        ImcKgM2 => ("imc_kg_m2", Paziente),
        TemperaturaCorporea => ("temperatura_corporea_c", ParametriVitali),
        Sato2 => ("sato2", ParametriVitali),
        OssigenoterapiaLMin => ("ossigenoterapia_l_min", Respirazione),
        VariazionePesoKg => ("variazione_peso_kg", Alimentazione),
        PesoKgAlimentazione => ("peso_kg_alimentazione", Alimentazione),
        AltezzaMtAlimentazione => ("altezza_mt_alimentazione", Alimentazione),
        ImcAlimentazione => ("imc", Alimentazione),
    }
}

field_kind! {
    /// Date inputs (`YYYY-MM-DD`).
    DateField {
        InterruzioneTabacco => ("data_interruzione_tabacco", PercezioneSalute),
        InterruzioneAlcolici => ("data_interruzione_alcolici", PercezioneSalute),
        DataCompilazione => ("data", Firma),
    }
}

field_kind! {
    /// Two-option `si`/`no` groups stored as booleans.
    FlagField {
        Ecg => ("ecg", ParametriVitali),
        ConsumoTabacco => ("consumo_tabacco", PercezioneSalute),
        InterrottoTabacco => ("interrotto_consumo_tabacco", PercezioneSalute),
        ConsumoAlcolici => ("consumo_alcolici", PercezioneSalute),
        InterrottoAlcolici => ("interrotto_consumo_alcolici", PercezioneSalute),
        AttivitaFisiche => ("attivita_fisiche_sportive", StoriaClinica),
        PatologieCroniche => ("patologie_croniche", StoriaClinica),
        PresenzaDiTosse => ("presenza_di_tosse", Respirazione),
        TrattamentoO2 => ("trattamento_o2", Respirazione),
        AspirazioniSecrezioni => ("aspirazioni_secrezioni", Respirazione),
        InfezioniUrinarie => ("infezioni_urinarie", EliminazioneUrinaria),
        Tao => ("tao", Terapie),
        Ossigenoterapia => ("ossigenoterapia", Terapie),
        FarmaciH => ("farmaci_h", Terapie),
    }
}

field_kind! {
    /// Single checkboxes stored as booleans.
    ToggleField {
        ProtesiUdito => ("protesi_udito", Comunicazione),
        Depressione => ("depressione", Stato),
        Agitazione => ("agitazione", Stato),
    }
}

option_kind! {
    /// Mutually exclusive option groups.
    ChoiceField {
        Struttura => ("struttura", Utente, STRUTTURA),
        StatoCoscienza => ("stato_coscienza", Comunicazione, STATO_DI_COSCIENZA),
        SorditaLato => ("sordita_lato", Comunicazione, LATO),
        ProtesiUditoLato => ("protesi_udito_lato", Comunicazione, LATO),
        TipologiaRespirazione => ("tipologia_respirazione", Respirazione, TIPOLOGIA_RESPIRAZIONE),
        StadioLesioni => ("stadio_lesioni_da_decubito", Circolazione, STADIO_LESIONI_DA_DECUBITO),
        RischioBraden => ("rischio_lesioni_scala_braden", Circolazione, RISCHIO_LESIONI_BRADEN),
        EscursioneArticolare => ("escursione_articolare", Stato, ESCURSIONE_ARTICOLARE),
        PresaMani => ("presa_mani", Stato, PRESA),
        DebolezzaManiLato => ("debolezza_mani_lato", Stato, LATO),
        ParalisiManiLato => ("paralisi_mani_lato", Stato, LATO),
        PresaArtiInferiori => ("presa_arti_inferiori", Stato, PRESA),
        DebolezzaArtiInferioriLato => ("debolezza_arti_inferiori_lato", Stato, LATO),
        ParalisiArtiInferioriLato => ("paralisi_arti_inferiori_lato", Stato, LATO),
        Ansia => ("ansia", Stato, ANSIA),
        AutonomiaMovimento => ("autonomia_movimento", MovimentoIgiene, AUTONOMIA_MOVIMENTO),
        RischioCaduteConley => ("rischio_cadute_conley", MovimentoIgiene, RISCHIO_CADUTE_CONLEY),
        AutonomiaPostura => ("autonomia_postura", MovimentoIgiene, AUTONOMIA_POSTURA),
        Lavarsi => ("lavarsi", MovimentoIgiene, LAVARSI),
        Vestirsi => ("vestirsi", MovimentoIgiene, VESTIRSI),
        AutonomiaWc => ("autonomia_wc", MovimentoIgiene, AUTONOMIA_BAGNO),
        AutonomiaDoccia => ("autonomia_doccia", MovimentoIgiene, AUTONOMIA_BAGNO),
        GradoAutonomiaIntestinale => ("grado_autonomia_intestinale", EliminazioneIntestinale, GRADO_AUTONOMIA_INTESTINALE),
        Consistenza => ("consistenza", EliminazioneIntestinale, CONSISTENZA),
        ColoreFeci => ("colore_intestinale", EliminazioneIntestinale, COLORE_FECI),
        PresidiIntestinale => ("presidi_intestinale", EliminazioneIntestinale, PRESIDI_INTESTINALE),
        GradoAutonomiaUrinaria => ("grado_autonomia_urinaria", EliminazioneUrinaria, GRADO_AUTONOMIA_URINARIA),
        IncontinenteTipo => ("incontinente_tipo", EliminazioneUrinaria, INCONTINENTE_TIPO),
        Minzione => ("minzione", EliminazioneUrinaria, MINZIONE),
        DiuresiRegolarita => ("diuresi_regolarita", EliminazioneUrinaria, DIURESI_REGOLARITA),
        CaratteristicheUrinarie => ("caratteristiche_urinarie", EliminazioneUrinaria, CARATTERISTICHE_URINARIE),
        PresidiUrinaria => ("presidi_urinaria", EliminazioneUrinaria, PRESIDI_URINARIA),
        AutonomiaAlimentazione => ("autonomia_alimentazione", Alimentazione, AUTONOMIA_ALIMENTAZIONE),
        Deglutizione => ("deglutizione", Alimentazione, DEGLUTIZIONE),
        Dieta => ("dieta", Alimentazione, DIETA),
        CavoOrale => ("cavo_orale", Alimentazione, CAVO_ORALE),
        StatoNutrizionaleMna => ("stato_nutrizionale_scala_mna", Alimentazione, STATO_NUTRIZIONALE_MNA),
        TipoVariazionePeso => ("tipo_variazione_peso", Alimentazione, TIPO_VARIAZIONE_PESO),
        GradoObesita => ("grado_obesita", Alimentazione, GRADO_OBESITA),
        IdratazioneStato => ("idratazione_stato", Alimentazione, IDRATAZIONE_STATO),
        IdratazioneAutonomia => ("idratazione_autonomia", Alimentazione, IDRATAZIONE_AUTONOMIA),
        RischioCaduteScalaConley => ("rischio_cadute_scala_di_conley", Rischio, LIVELLO_RISCHIO),
        RischioInfezioniIca => ("rischio_infezioni_ica", Rischio, LIVELLO_RISCHIO),
    }
}

option_kind! {
    /// Checkbox groups allowing several options.
    MultiField {
        Comunicazione => ("comunicazione", Comunicazione, COMUNICAZIONE),
        Udito => ("udito", Comunicazione, UDITO),
        Vista => ("vista", Comunicazione, VISTA),
        ProtesiVista => ("protesi_vista", Comunicazione, PROTESI_VISTA),
        CondizioniPsichiche => ("condizioni_psichiche", Comunicazione, CONDIZIONI_PSICHICHE),
        DispneaTipo => ("dispnea_tipo", Respirazione, DISPNEA_TIPO),
        AllergieRespirazione => ("allergie_respirazione", Respirazione, ALLERGIE_RESPIRAZIONE),
        PresidiRespirazione => ("presidi_respirazione", Respirazione, PRESIDI_RESPIRAZIONE),
        PresidiProtesi => ("presidi_protesi", Circolazione, PRESIDI_PROTESI),
        CuteMucose => ("cute_mucose", Circolazione, CUTE_MUCOSE),
        IntegritaCutanea => ("integrita_cutanea", Circolazione, INTEGRITA_CUTANEA),
        RiposoSonno => ("riposo_sonno", Stato, RIPOSO_SONNO),
        TipoDolore => ("tipo_dolore", Stato, TIPO_DOLORE),
        CaratteristicheDolore => ("caratteristiche_dolore", Stato, CARATTERISTICHE_DOLORE),
        TerapiaAntidolorifica => ("terapia_antidolorifica", Stato, TERAPIA_ANTIDOLORIFICA),
        AusiliPresidiMovimento => ("ausili_presidi_movimento", MovimentoIgiene, AUSILI_PRESIDI_MOVIMENTO),
        PosturaObbligataCausa => ("postura_obbligata_causa", MovimentoIgiene, POSTURA_OBBLIGATA_CAUSA),
        AusiliPresidiPostura => ("ausili_presidi_postura", MovimentoIgiene, AUSILI_PRESIDI_POSTURA),
        ProtesiAlimentazione => ("protesi_alimentazione", Alimentazione, PROTESI_DENTARIA),
        PresidiAlimentazione => ("presidi_alimentazione", Alimentazione, PRESIDI_ALIMENTAZIONE),
        PresenzaDi => ("presenza_di", Alimentazione, PRESENZA_DI),
        Addome => ("addome", Alimentazione, ADDOME),
    }
}

/// Selection of a `si`/`no` group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum YesNo {
    Si,
    No,
}

impl YesNo {
    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::Si => "si",
            YesNo::No => "no",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "si" => Some(YesNo::Si),
            "no" => Some(YesNo::No),
            _ => None,
        }
    }

    pub fn from_bool(value: bool) -> Self {
        if value {
            YesNo::Si
        } else {
            YesNo::No
        }
    }
}

/// A numeric input of either kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumberField {
    Int(IntField),
    Float(FloatField),
}

impl From<IntField> for NumberField {
    fn from(field: IntField) -> Self {
        NumberField::Int(field)
    }
}

impl From<FloatField> for NumberField {
    fn from(field: FloatField) -> Self {
        NumberField::Float(field)
    }
}

/// Any form control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    Text(TextField),
    Int(IntField),
    Float(FloatField),
    Date(DateField),
    Flag(FlagField),
    Toggle(ToggleField),
    Choice(ChoiceField),
    Multi(MultiField),
}

impl FieldKey {
    /// Every control of the form.
    pub fn all() -> impl Iterator<Item = FieldKey> {
        TextField::ALL
            .iter()
            .map(|f| FieldKey::Text(*f))
            .chain(IntField::ALL.iter().map(|f| FieldKey::Int(*f)))
            .chain(FloatField::ALL.iter().map(|f| FieldKey::Float(*f)))
            .chain(DateField::ALL.iter().map(|f| FieldKey::Date(*f)))
            .chain(FlagField::ALL.iter().map(|f| FieldKey::Flag(*f)))
            .chain(ToggleField::ALL.iter().map(|f| FieldKey::Toggle(*f)))
            .chain(ChoiceField::ALL.iter().map(|f| FieldKey::Choice(*f)))
            .chain(MultiField::ALL.iter().map(|f| FieldKey::Multi(*f)))
    }

    /// Resolve a control identifier.
    pub fn from_control_id(id: &str) -> Option<FieldKey> {
        FieldKey::all().find(|f| f.id() == id)
    }

    pub fn id(self) -> &'static str {
        match self {
            FieldKey::Text(f) => f.id(),
            FieldKey::Int(f) => f.id(),
            FieldKey::Float(f) => f.id(),
            FieldKey::Date(f) => f.id(),
            FieldKey::Flag(f) => f.id(),
            FieldKey::Toggle(f) => f.id(),
            FieldKey::Choice(f) => f.id(),
            FieldKey::Multi(f) => f.id(),
        }
    }

    pub fn section(self) -> Section {
        match self {
            FieldKey::Text(f) => f.section(),
            FieldKey::Int(f) => f.section(),
            FieldKey::Float(f) => f.section(),
            FieldKey::Date(f) => f.section(),
            FieldKey::Flag(f) => f.section(),
            FieldKey::Toggle(f) => f.section(),
            FieldKey::Choice(f) => f.section(),
            FieldKey::Multi(f) => f.section(),
        }
    }

    /// Kind name, as shown by `cartella fields`.
    pub fn kind(self) -> &'static str {
        match self {
            FieldKey::Text(_) => "text",
            FieldKey::Int(_) => "integer",
            FieldKey::Float(_) => "decimal",
            FieldKey::Date(_) => "date",
            FieldKey::Flag(_) => "si/no",
            FieldKey::Toggle(_) => "checkbox",
            FieldKey::Choice(_) => "choice",
            FieldKey::Multi(_) => "multi",
        }
    }

    /// Option vocabulary of option groups; empty for other kinds.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            FieldKey::Choice(f) => f.options(),
            FieldKey::Multi(f) => f.options(),
            FieldKey::Flag(_) => vocab::SI_NO,
            _ => &[],
        }
    }

    /// Human-readable label derived from the control identifier.
    pub fn label(self) -> String {
        match self.id() {
            "inizNome" => return "Iniziale nome".to_string(),
            "inizCognome" => return "Iniziale cognome".to_string(),
            "data" => return "Data di compilazione".to_string(),
            _ => {}
        }
        let spaced = self.id().replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}
