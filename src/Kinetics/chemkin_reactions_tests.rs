///////////////////////////TESTING////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use crate::Kinetics::chemkin_reactions::{
        AVOGADRO, Arrhenius, Kinetics, PDepArrhenius, R_CAL, RateExpression, Reaction,
        ReactionUnits, check_for_unmarked_duplicates, mark_duplicate_reactions,
        read_reaction_entry, write_reaction_entry,
    };
    use crate::Kinetics::species::Species;
    use crate::Utils::diagnostics::Diagnostics;
    use crate::chemkin_error::ChemkinError;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    const NAMES: [&str; 10] = [
        "H", "O2", "HO2", "CH3", "C2H6", "N2", "AR", "H2O", "H3O+", "e",
    ];

    fn species() -> Vec<Species> {
        NAMES.iter().map(|n| Species::new(n)).collect()
    }

    fn lookup() -> HashMap<String, usize> {
        NAMES
            .iter()
            .enumerate()
            .map(|(i, n)| (n.to_string(), i))
            .collect()
    }

    fn read(lines: &[&str], units: &ReactionUnits) -> Result<Reaction, ChemkinError> {
        read_reaction_entry(lines, &lookup(), units, 1)
    }

    fn kcal() -> ReactionUnits {
        ReactionUnits::from_header("REACTIONS    KCAL/MOLE   MOLES").unwrap()
    }

    #[test]
    fn test_units_from_header() {
        let line = ["H + O2 <=> HO2    1.0E13  0.0  1.0"];
        let r = read(&line, &kcal()).unwrap();
        assert_eq!(r.kinetics, Kinetics::Arrhenius(Arrhenius::new(1e13, 0.0, 1000.0)));
        assert!(r.reversible);

        let kj = ReactionUnits::from_header("REACTIONS KJOULES/MOLE").unwrap();
        let r = read(&line, &kj).unwrap();
        let Kinetics::Arrhenius(k) = &r.kinetics else {
            panic!("expected Arrhenius kinetics")
        };
        assert_relative_eq!(k.ea, 1000.0 / 4.184);

        let kelvins = ReactionUnits::from_header("REACTIONS KELVINS MOLECULES").unwrap();
        let r = read(&line, &kelvins).unwrap();
        let Kinetics::Arrhenius(k) = &r.kinetics else {
            panic!("expected Arrhenius kinetics")
        };
        assert_relative_eq!(k.ea, R_CAL);
        assert_relative_eq!(k.a, 1e13 * AVOGADRO, max_relative = 1e-12);

        assert!(matches!(
            ReactionUnits::from_header("REACTIONS EVOLTS"),
            Err(ChemkinError::UnsupportedUnits(ref u)) if u == "EVOLTS"
        ));
        assert_eq!(
            ReactionUnits::from_header("REACTIONS").unwrap(),
            ReactionUnits::default()
        );
    }

    #[test]
    fn test_multiplier_and_third_body() {
        let lines = ["2CH3 + M = C2H6 + M   1.0E16 -1.0 0.0", "N2/1.4/ AR/0.7/"];
        let molecules = ReactionUnits::from_header("REACTIONS MOLECULES").unwrap();
        let r = read(&lines, &molecules).unwrap();
        assert_eq!(r.reactants, vec![3, 3]);
        assert_eq!(r.products, vec![4]);
        let Kinetics::ThirdBody(k) = &r.kinetics else {
            panic!("expected third body kinetics")
        };
        // termolecular: two factors of Avogadro's number
        assert_relative_eq!(k.arrhenius.a, 1e16 * AVOGADRO * AVOGADRO, max_relative = 1e-12);
        assert_eq!(k.efficiencies, vec![(5, 1.4), (6, 0.7)]);
        assert!(r.kinetics.is_pressure_dependent());
    }

    #[test]
    fn test_irreversible_ions() {
        let r = read(&["H3O+ + e => H2O + H   1.0E18 -0.5 0.0"], &kcal()).unwrap();
        assert!(!r.reversible);
        assert_eq!(r.reactants, vec![8, 9]);
        assert_eq!(r.products, vec![7, 0]);
    }

    #[test]
    fn test_troe_falloff() {
        let lines = [
            "2CH3(+M)<=>C2H6(+M)     2.12E16 -0.97 0.62",
            "    LOW/ 1.77E50 -9.67 6.22/",
            "    TROE/ 0.5325 151.0 1038.0 4970.0/",
            "H2O/6.0/ AR/0.7/",
        ];
        let r = read(&lines, &kcal()).unwrap();
        let Kinetics::Troe(k) = &r.kinetics else {
            panic!("expected Troe kinetics")
        };
        assert_eq!(k.high, Arrhenius::new(2.12e16, -0.97, 620.0));
        assert_eq!(k.low, Arrhenius::new(1.77e50, -9.67, 6220.0));
        assert_eq!((k.alpha, k.t3, k.t1, k.t2), (0.5325, 151.0, 1038.0, Some(4970.0)));
        assert_eq!(k.efficiencies.len(), 2);
        assert!(r.specific_collider.is_none());

        let t = 1000.0;
        let k_high = k.high.k(t);
        let k_fall = r.rate_constant(t, 101325.0);
        assert!(k_fall > 0.0 && k_fall < k_high);
        assert_relative_eq!(r.rate_constant(t, 1e15), k_high, max_relative = 1e-3);
    }

    #[test]
    fn test_lindemann_with_specific_collider() {
        let lines = [
            "H + O2 (+AR) <=> HO2 (+AR)   4.65E12 0.44 0.0",
            "LOW/ 9.04E19 -1.5 0.49/",
        ];
        let r = read(&lines, &kcal()).unwrap();
        assert_eq!(r.specific_collider, Some(6));
        assert_eq!(r.kinetics.model_name(), "Lindemann");
        assert_eq!(r.equation(&species()).unwrap(), "H + O2 (+AR) <=> HO2 (+AR)");
    }

    #[test]
    fn test_indexed_collider_round_trip() {
        let mut spc = species();
        spc[5].index = Some(35);
        let mut lookup = lookup();
        lookup.remove("N2");
        lookup.insert("N2(35)".to_string(), 5);
        let lines = [
            "H+O2(+N2(35))<=>HO2(+N2(35))  4.65E12 0.44 0.0",
            "LOW/ 9.04E19 -1.5 0.49/",
        ];
        let r = read_reaction_entry(&lines, &lookup, &kcal(), 1).unwrap();
        assert_eq!(r.specific_collider, Some(5));
        assert_eq!(r.reactants, vec![0, 1]);
        assert_eq!(r.products, vec![2]);
        assert_eq!(
            r.equation(&spc).unwrap(),
            "H + O2 (+N2(35)) <=> HO2 (+N2(35))"
        );

        let text = write_reaction_entry(&r, &spc).unwrap();
        let written: Vec<&str> = text.lines().collect();
        let reread = read_reaction_entry(&written, &lookup, &kcal(), 1).unwrap();
        assert_eq!(reread, r);
    }

    #[test]
    fn test_plog() {
        let lines = [
            "H + O2 <=> HO2   1.0 0.0 0.0",
            "PLOG/ 0.1   1.0E12 0.0 0.0/",
            "PLOG/ 10.0  1.0E14 0.0 0.0/",
        ];
        let r = read(&lines, &kcal()).unwrap();
        let Kinetics::PDepArrhenius(k) = &r.kinetics else {
            panic!("expected PLOG kinetics")
        };
        assert_eq!(k.pressures, vec![0.1, 10.0]);
        // log interpolation: 1 atm is halfway between 0.1 and 10 atm
        assert_relative_eq!(r.rate_constant(1000.0, 101325.0), 1e13, max_relative = 1e-9);
        assert_relative_eq!(r.rate_constant(1000.0, 1.0), 1e12);
        assert_relative_eq!(r.rate_constant(1000.0, 1e9), 1e14);
    }

    #[test]
    fn test_reading_errors() {
        let result = read(&["H + CH4 <=> H2 + CH3   1.0 0.0 0.0"], &kcal());
        assert!(matches!(
            result,
            Err(ChemkinError::UnexpectedSpecies { ref species, .. }) if species == "CH4"
        ));
        if let Err(e) = result {
            assert_eq!(
                e.to_string(),
                "Unexpected species identifier CH4 in reaction H+CH4<=>H2+CH3."
            );
        }
        let sri = ["H + O2 (+M) <=> HO2 (+M)  1.0 0.0 0.0", "LOW/1.0 0.0 0.0/", "SRI/0.1 2.0 3.0/"];
        assert!(matches!(
            read(&sri, &kcal()),
            Err(ChemkinError::MalformedReaction { .. })
        ));
        let no_low = ["H + O2 (+M) <=> HO2 (+M)  1.0 0.0 0.0"];
        assert!(read(&no_low, &kcal()).is_err());
        assert!(read(&["H + O2 <=> HO2  1.0 x 0.0"], &kcal()).is_err());
        assert!(read(&["H + O2 HO2  1.0 0.0 0.0"], &kcal()).is_err());
        assert!(read(&["H + O2 <=> HO2  1.0 0.0 0.0", "LOW/1.0 0.0 0.0/"], &kcal()).is_err());
    }

    #[test]
    fn test_write_entries() {
        let spc = species();
        let lines = [
            "2CH3(+M)<=>C2H6(+M)     2.12E16 -0.97 0.62",
            "LOW/ 1.77E50 -9.67 6.22/",
            "TROE/ 0.5325 151.0 1038.0 4970.0/",
            "H2O/6.0/ AR/0.7/",
            "DUP",
        ];
        let r = read(&lines, &kcal()).unwrap();
        assert!(r.duplicate);
        let text = write_reaction_entry(&r, &spc).unwrap();
        let written: Vec<&str> = text.lines().collect();
        assert_eq!(
            written[0].trim_end(),
            format!(
                "{:<51} 2.12000e+16 -0.970    0.620",
                "CH3 + CH3 (+M) <=> C2H6 (+M)"
            )
        );
        assert_eq!(written[1].trim_end(), "    LOW/ 1.77000e+50 -9.670    6.220    /");
        assert_eq!(written[2], "    TROE/ 0.5325 151 1038 4970/");
        assert_eq!(written[3], "H2O/6.00/ AR/0.70/");
        assert_eq!(written[4], "DUPLICATE");

        let reread = read(&written, &kcal()).unwrap();
        assert_eq!(reread, r);
    }

    #[test]
    fn test_write_plog_and_third_body() {
        let spc = species();
        let plog = read(
            &["H + O2 <=> HO2   1.0 0.0 0.0", "PLOG/ 0.1 1.0E12 0.5 1.5/", "PLOG/ 10.0 1.0E14 0.0 0.0/"],
            &kcal(),
        )
        .unwrap();
        let text = write_reaction_entry(&plog, &spc).unwrap();
        assert!(text.contains("    PLOG/ 0.100     1.00000e+12 0.500     1.500    /"));
        let written: Vec<&str> = text.lines().collect();
        assert_eq!(read(&written, &kcal()).unwrap(), plog);

        let third_body = read(&["H + O2 + M => HO2 + M   1.23456789E18 -0.8 0.0", "AR/0.5/"], &kcal()).unwrap();
        let text = write_reaction_entry(&third_body, &spc).unwrap();
        assert!(text.starts_with("H + O2 + M => HO2 + M"));
        let written: Vec<&str> = text.lines().collect();
        let reread = read(&written, &kcal()).unwrap();
        let Kinetics::ThirdBody(k) = &reread.kinetics else {
            panic!("expected third body kinetics")
        };
        // six significant digits of A survive
        assert_relative_eq!(k.arrhenius.a, 1.23457e18);
        assert!(!reread.reversible);
    }

    fn arrhenius_reaction(index: usize, reactants: Vec<usize>, products: Vec<usize>) -> Reaction {
        Reaction {
            index,
            reactants,
            products,
            reversible: true,
            duplicate: false,
            kinetics: Kinetics::Arrhenius(Arrhenius::new(1e13, 0.0, 0.0)),
            specific_collider: None,
            family: None,
            library: None,
            comment: String::new(),
        }
    }

    #[test]
    fn test_mark_duplicates() {
        let spc = species();
        let mut reactions = vec![
            arrhenius_reaction(1, vec![0, 1], vec![2]),
            arrhenius_reaction(2, vec![1, 0], vec![2]),
            arrhenius_reaction(3, vec![3, 3], vec![4]),
        ];
        let mut diag = Diagnostics::new();
        mark_duplicate_reactions(&mut reactions, &spc, &mut diag);
        assert!(reactions[0].duplicate && reactions[1].duplicate);
        assert!(!reactions[2].duplicate);
        assert_eq!(
            diag.last_warning(),
            Some("Marked reaction H + O2 <=> HO2 as duplicate of O2 + H <=> HO2 for saving to Chemkin file.")
        );
    }

    #[test]
    fn test_unmark_duplicates() {
        let spc = species();
        let mut diag = Diagnostics::new();

        let mut pdep = arrhenius_reaction(2, vec![0, 1], vec![2]);
        pdep.kinetics = Kinetics::PDepArrhenius(PDepArrhenius {
            pressures: vec![1.0],
            arrhenius: vec![Arrhenius::new(1e13, 0.0, 0.0)],
        });
        pdep.duplicate = true;
        let mut plain = arrhenius_reaction(1, vec![0, 1], vec![2]);
        plain.duplicate = true;
        let mut reactions = vec![plain, pdep];
        mark_duplicate_reactions(&mut reactions, &spc, &mut diag);
        assert!(!reactions[0].duplicate && !reactions[1].duplicate);
        assert_eq!(
            diag.last_warning(),
            Some("Marked reaction H + O2 <=> HO2 as not duplicate because of varying pressure dependence for saving to Chemkin file.")
        );

        let mut forward = arrhenius_reaction(1, vec![0, 1], vec![2]);
        forward.reversible = false;
        forward.duplicate = true;
        let mut backward = arrhenius_reaction(2, vec![2], vec![0, 1]);
        backward.reversible = false;
        backward.duplicate = true;
        let mut reactions = vec![forward.clone(), backward.clone()];
        mark_duplicate_reactions(&mut reactions, &spc, &mut diag);
        assert!(!reactions[0].duplicate && !reactions[1].duplicate);

        // irreversible in opposite directions is no duplicate to begin with
        forward.duplicate = false;
        backward.duplicate = false;
        let mut reactions = vec![forward, backward];
        mark_duplicate_reactions(&mut reactions, &spc, &mut diag);
        assert!(!reactions[0].duplicate && !reactions[1].duplicate);
    }

    #[test]
    fn test_check_for_unmarked_duplicates() {
        let spc = species();
        let mut reactions = vec![
            arrhenius_reaction(1, vec![0, 1], vec![2]),
            arrhenius_reaction(2, vec![0, 1], vec![2]),
        ];
        let result = check_for_unmarked_duplicates(&reactions, &spc);
        assert!(matches!(result, Err(ChemkinError::UnmarkedDuplicate(_))));
        if let Err(e) = result {
            assert_eq!(e.to_string(), "Encountered unmarked duplicate reaction H + O2 <=> HO2.");
        }
        reactions[0].duplicate = true;
        reactions[1].duplicate = true;
        assert!(check_for_unmarked_duplicates(&reactions, &spc).is_ok());

        let mut third_body = arrhenius_reaction(2, vec![0, 1], vec![2]);
        third_body.kinetics = Kinetics::ThirdBody(crate::Kinetics::chemkin_reactions::ThirdBody {
            arrhenius: Arrhenius::new(1e13, 0.0, 0.0),
            efficiencies: vec![],
        });
        let reactions = vec![arrhenius_reaction(1, vec![0, 1], vec![2]), third_body];
        assert!(check_for_unmarked_duplicates(&reactions, &spc).is_ok());
    }
}
