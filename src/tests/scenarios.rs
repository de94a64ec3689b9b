use std::collections::BTreeMap;

use layered_coref_features::{Example, Template};

use crate::{
    ClassifierConfig, ClusterDisplay, CorefError, CorefResult, CorefSystem, Document,
    DocumentBuilder, FeatureConfig, GoldEntities, LinearModel, LinearTrainer,
    LogisticRegressionTrainer, MentionId, Sentence, SieveConfig, Strategy, TrainedModel,
};

fn document(id: &str, sentences: &[&str], mentions: &[(usize, usize, usize)]) -> Document {
    let mut b = DocumentBuilder::new(id);
    for s in sentences {
        b.add_sentence(Sentence::parse(s).unwrap());
    }
    for &(s, begin, end) in mentions {
        b.add_mention(s, begin, end).unwrap();
    }
    b.build()
}

/// "Alice said she won. Bob said he lost."
fn alice_and_bob() -> Document {
    document(
        "alice-bob",
        &[
            "(ROOT (S (NP (NNP Alice)) (VP (VBD said) (SBAR (S (NP (PRP she)) (VP (VBD won))))) (. .)))",
            "(ROOT (S (NP (NNP Bob)) (VP (VBD said) (SBAR (S (NP (PRP he)) (VP (VBD lost))))) (. .)))",
        ],
        &[(0, 0, 1), (0, 2, 3), (1, 0, 1), (1, 2, 3)],
    )
}

/// "Obama met Putin. Obama smiled."
fn obama_meets_putin() -> (Document, GoldEntities) {
    let doc = document(
        "train",
        &[
            "(ROOT (S (NP (NNP Obama)) (VP (VBD met) (NP (NNP Putin))) (. .)))",
            "(ROOT (S (NP (NNP Obama)) (VP (VBD smiled)) (. .)))",
        ],
        &[(0, 0, 1), (0, 2, 3), (1, 0, 1)],
    );
    let gold = GoldEntities::new(&doc, vec![vec![MentionId(0), MentionId(2)], vec![MentionId(1)]]);
    (doc, gold)
}

fn trained_sieve() -> CorefSystem {
    let mut system = CorefSystem::new(Strategy::Sieve(SieveConfig::default())).unwrap();
    system.train(&[]).unwrap();
    system
}

#[test]
fn sieve_resolves_alice_and_bob() {
    let doc = alice_and_bob();
    let clustering = trained_sieve().resolve(&doc).unwrap();
    assert_eq!(
        clustering.groups(),
        vec![
            vec![MentionId(0), MentionId(1)],
            vec![MentionId(2), MentionId(3)],
        ]
    );

    insta::assert_snapshot!(ClusterDisplay::new(&doc, &clustering), @r###"
    Alice  said  she  won  .
    ╰───╯[A] Alice
                 ╰─╯[A] she
    Bob  said  he  lost  .
    ╰─╯[B] Bob
               ╰╯[B] he
    "###);
}

#[test]
fn single_mention_is_singleton() {
    let doc = document(
        "single",
        &["(ROOT (S (NP (NNP Alice)) (VP (VBD slept))))"],
        &[(0, 0, 1)],
    );
    for system in [
        trained_sieve(),
        CorefSystem::new(Strategy::AllSingleton).unwrap(),
        CorefSystem::new(Strategy::OneCluster).unwrap(),
    ] {
        let clustering = system.resolve(&doc).unwrap();
        assert_eq!(clustering.groups(), vec![vec![MentionId(0)]]);
    }
}

#[test]
fn empty_document_resolves_to_nothing() {
    let doc = document("empty", &["(ROOT (S (VP (VBD rained))))"], &[]);
    let clustering = trained_sieve().resolve(&doc).unwrap();
    assert!(clustering.is_empty());
    assert_eq!(clustering.entity_count(), 0);
}

#[test]
fn resolve_before_train_is_an_error() {
    let doc = alice_and_bob();
    for strategy in [
        Strategy::HeadBaseline,
        Strategy::Sieve(SieveConfig::default()),
        Strategy::Classifier(ClassifierConfig::default()),
    ] {
        let system = CorefSystem::new(strategy).unwrap();
        assert!(!system.is_trained());
        assert!(matches!(system.resolve(&doc), Err(CorefError::NotTrained(_))));
        assert!(matches!(system.export_model(), Err(CorefError::NotTrained(_))));
    }
    // Nothing to learn: usable straight away.
    let system = CorefSystem::new(Strategy::AllSingleton).unwrap();
    assert_eq!(system.resolve(&doc).unwrap().entity_count(), 4);
}

#[test]
fn incomplete_gold_is_rejected() {
    let (doc, _) = obama_meets_putin();
    let gold = GoldEntities::new(&doc, vec![vec![MentionId(0), MentionId(2)]]);

    let mut system = CorefSystem::new(Strategy::Classifier(ClassifierConfig::default())).unwrap();
    let err = system.train(&[(doc, gold)]).unwrap_err();
    assert!(matches!(
        err,
        CorefError::CorpusInconsistency { ref document, mention: 1 } if document == "train"
    ));
    assert!(!system.is_trained());
}

#[test]
fn gold_naming_unknown_or_repeated_mentions_is_rejected() {
    let (doc, _) = obama_meets_putin();
    let unknown = GoldEntities::new(
        &doc,
        vec![vec![MentionId(0), MentionId(1), MentionId(2), MentionId(7)]],
    );
    let repeated = GoldEntities::new(
        &doc,
        vec![vec![MentionId(0), MentionId(2)], vec![MentionId(1), MentionId(2)]],
    );

    for (gold, mention) in [(unknown, 7), (repeated, 2)] {
        for strategy in [
            Strategy::HeadBaseline,
            Strategy::Sieve(SieveConfig::default()),
            Strategy::Classifier(ClassifierConfig::default()),
        ] {
            let mut system = CorefSystem::new(strategy).unwrap();
            let err = system.train(&[(doc.clone(), gold.clone())]).unwrap_err();
            assert!(matches!(
                err,
                CorefError::CorpusInconsistency { mention: m, .. } if m == mention
            ));
            assert!(!system.is_trained());
        }
    }
}

#[test]
fn head_baseline_uses_trained_heads() {
    // "Obama met reporters. The president smiled." with Obama = president.
    let train = document(
        "heads",
        &[
            "(ROOT (S (NP (NNP Obama)) (VP (VBD met) (NP (NNS reporters)))))",
            "(ROOT (S (NP (NN president)) (VP (VBD smiled))))",
        ],
        &[(0, 0, 1), (0, 2, 3), (1, 0, 1)],
    );
    let gold = GoldEntities::new(&train, vec![vec![MentionId(0), MentionId(2)], vec![MentionId(1)]]);

    let mut system = CorefSystem::new(Strategy::HeadBaseline).unwrap();
    system.train(&[(train, gold)]).unwrap();

    let doc = document(
        "test",
        &[
            "(ROOT (S (NP (NN president)) (VP (VBD waved))))",
            "(ROOT (S (NP (NNP Obama)) (VP (VBD left))))",
        ],
        &[(0, 0, 1), (1, 0, 1)],
    );
    let clustering = system.resolve(&doc).unwrap();
    assert!(clustering.same_entity(MentionId(0), MentionId(1)));
}

#[test]
fn classifier_end_to_end() {
    let features = FeatureConfig::from_names(&["ExactMatch"], Default::default()).unwrap();
    let config = ClassifierConfig {
        features,
        trainer: LogisticRegressionTrainer {
            l2: 0.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut system = CorefSystem::new(Strategy::Classifier(config)).unwrap();
    system.train(&[obama_meets_putin()]).unwrap();

    let doc = document(
        "test",
        &[
            "(ROOT (S (NP (NNP Putin)) (VP (VBD called) (NP (NNP Obama)))))",
            "(ROOT (S (NP (NNP Putin)) (VP (VBD hung) (PRT (RP up)))))",
        ],
        &[(0, 0, 1), (0, 2, 3), (1, 0, 1)],
    );
    let clustering = system.resolve(&doc).unwrap();
    assert_eq!(
        clustering.groups(),
        vec![vec![MentionId(0), MentionId(2)], vec![MentionId(1)]]
    );

    let model = system.model().unwrap();
    let TrainedModel::Classifier(linear) = &*model else {
        panic!("expected a classifier model");
    };
    let (top, weight) = linear.top_features(1)[0];
    assert_eq!(top.template(), Some(Template::ExactMatch));
    assert!(weight.abs() > 1.0);
}

/// Links every mention to its predecessor.
struct AlwaysLink;

impl LinearTrainer for AlwaysLink {
    fn train(&self, _examples: &[Example]) -> CorefResult<LinearModel> {
        Ok(LinearModel::new(BTreeMap::new(), 1.0))
    }
}

#[test]
fn classifier_with_custom_trainer() {
    let mut system = CorefSystem::new(Strategy::Classifier(ClassifierConfig::default())).unwrap();
    system.train_with(&AlwaysLink, &[obama_meets_putin()]).unwrap();
    let clustering = system.resolve(&alice_and_bob()).unwrap();
    assert_eq!(clustering.entity_count(), 1);

    // Only the classifier takes a trainer.
    let mut sieve = CorefSystem::new(Strategy::Sieve(SieveConfig::default())).unwrap();
    assert!(matches!(
        sieve.train_with(&AlwaysLink, &[]),
        Err(CorefError::Config(_))
    ));
}

#[test]
fn batch_keeps_document_order() {
    let system = trained_sieve();
    let docs = vec![alice_and_bob(), obama_meets_putin().0];
    let batch = system.resolve_batch(&docs).unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0], system.resolve(&docs[0]).unwrap());
    assert_eq!(batch[1].entity_count(), 2);
}

#[test]
fn model_of_wrong_kind_is_rejected() {
    let model = TrainedModel::Classifier(LinearModel::default());
    let err = CorefSystem::new(Strategy::HeadBaseline)
        .unwrap()
        .with_model(model)
        .unwrap_err();
    insta::assert_snapshot!(err, @"invalid configuration: a `classifier` model cannot be used by the `head_baseline` strategy");
}
