use mirrordb_build::{
    context::MirrorContext, entity::MirroredEntity, prelude::*, worklist::Worklist,
};
use proptest::prelude::*;
use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    sync::Mutex,
};

// graph
// a diamond, a mutual cycle, a self loop, an interface base and one
// unreachable entity
fn graph() -> Vec<TypeDecl> {
    let link = |name: &str, ty: Syntax| Member::property(name, ty);
    let many = |entity: &str| Syntax::generic("ICollection", vec![Syntax::ty(entity)]);

    vec![
        TypeDecl::class("Account")
            .with_member(link("Id", Syntax::ty("Guid")))
            .with_member(link("Profile", Syntax::ty("Profile")))
            .with_member(link("Invoices", many("Invoice"))),
        TypeDecl::class("Profile")
            .with_member(link("Address", Syntax::ty("Address")))
            .with_member(link("Account", Syntax::ty("Account"))),
        TypeDecl::class("Invoice")
            .with_base(Syntax::ty("IAudited"))
            .with_member(link("Address", Syntax::ty("Address")))
            .with_member(link("Lines", Syntax::array(Syntax::ty("InvoiceLine")))),
        TypeDecl::class("InvoiceLine").with_member(link("Next", Syntax::ty("InvoiceLine"))),
        TypeDecl::class("Address").with_member(link("Street", Syntax::ty("string"))),
        TypeDecl::interface("IAudited").with_member(link("Created", Syntax::ty("DateTime"))),
        TypeDecl::class("Unreachable").with_member(link("Account", Syntax::ty("Account"))),
    ]
}

fn roots() -> Vec<TypeDecl> {
    vec![
        TypeDecl::class("BillingContext")
            .with_member(Member::property(
                "Invoices",
                Syntax::generic("DbSet", vec![Syntax::ty("Invoice")]),
            ))
            .with_member(Member::property(
                "Accounts",
                Syntax::generic("DbSet", vec![Syntax::ty("Account")]),
            )),
        TypeDecl::class("ProfileContext").with_member(Member::property(
            "Profiles",
            Syntax::generic("DbSet", vec![Syntax::ty("Profile")]),
        )),
    ]
}

fn build(decls: Vec<TypeDecl>, roots: Vec<TypeDecl>) -> Model {
    let config = GeneratorConfig::default();
    let mut model = Model::new();
    for decl in decls {
        model.add_declaration(decl).unwrap();
    }
    for decl in roots {
        let root = AggregateRootDecl::discover(decl, &model, &ModelResolver::new(&model), &config);
        model.add_root(root).unwrap();
    }
    model
}

fn generate(model: &Model) -> Generated {
    Generator::new(model, &GeneratorConfig::default()).generate()
}

#[test]
fn every_reachable_entity_is_mirrored_exactly_once() {
    let out = generate(&build(graph(), roots()));

    let ids: Vec<_> = out.entities.iter().map(|e| e.source.id()).collect();
    let unique: BTreeSet<_> = ids.iter().copied().collect();

    assert_eq!(ids.len(), unique.len());
    assert_eq!(
        ids,
        [
            "Account",
            "Address",
            "IAudited",
            "Invoice",
            "InvoiceLine",
            "Profile"
        ]
    );
}

#[test]
fn every_collection_navigation_uses_the_read_only_view() {
    let out = generate(&build(graph(), roots()));

    let invoice = &out.entity("Invoice").unwrap().decl;
    let lines = invoice.member("Lines").and_then(Member::value_type);
    assert_eq!(
        lines.map(ToString::to_string).as_deref(),
        Some("IReadOnlyCollection<ReadOnlyInvoiceLine>")
    );

    let account = &out.entity("Account").unwrap().decl;
    let invoices = account.member("Invoices").and_then(Member::value_type);
    assert_eq!(
        invoices.map(ToString::to_string).as_deref(),
        Some("IReadOnlyCollection<ReadOnlyInvoice>")
    );
}

#[test]
fn repeated_runs_are_byte_identical() {
    let model = build(graph(), roots());

    assert_eq!(
        generate(&model).to_json().unwrap(),
        generate(&model).to_json().unwrap()
    );
}

//
// Random graphs
//

// Nav
// one navigation member; names are fixed before members are reordered
#[derive(Clone, Debug)]
struct Nav {
    name: String,
    target: usize,
    many: bool,
}

type Graph = Vec<Vec<Nav>>;

fn entity_name(i: usize) -> String {
    format!("E{i}")
}

// arb_case
// a graph (self loops, cycles and diamonds arise freely), the same graph
// with each entity's navigations reordered, seeds, and the seeds shuffled
fn arb_case() -> impl Strategy<Value = (Graph, Graph, Vec<usize>, Vec<usize>)> {
    (1..8usize)
        .prop_flat_map(|n| {
            let edges = prop::collection::vec((0..n, any::<bool>()), 0..4);

            (
                prop::collection::vec(edges, n),
                prop::collection::vec(0..n, 1..4),
            )
        })
        .prop_map(|(edges, seeds)| {
            let graph: Graph = edges
                .into_iter()
                .map(|navs| {
                    navs.into_iter()
                        .enumerate()
                        .map(|(j, (target, many))| Nav {
                            name: format!("Nav{j}"),
                            target,
                            many,
                        })
                        .collect()
                })
                .collect();

            (graph, seeds)
        })
        .prop_flat_map(|(graph, seeds)| {
            let permuted: Vec<_> = graph
                .iter()
                .map(|navs| Just(navs.clone()).prop_shuffle())
                .collect();
            let shuffled = Just(seeds.clone()).prop_shuffle();

            (Just(graph), permuted, Just(seeds), shuffled)
        })
}

fn graph_model(graph: &Graph) -> Model {
    let mut model = Model::new();

    for (i, navs) in graph.iter().enumerate() {
        let decl = navs.iter().fold(TypeDecl::class(entity_name(i)), |decl, nav| {
            let target = Syntax::ty(entity_name(nav.target));
            let ty = if nav.many {
                Syntax::generic("List", vec![target])
            } else {
                target
            };

            decl.with_member(Member::property(nav.name.as_str(), ty))
        });
        model.add_declaration(decl).unwrap();
    }

    model
}

fn reachable(graph: &Graph, seeds: &[usize]) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    let mut queue: VecDeque<usize> = seeds.iter().copied().collect();

    while let Some(i) = queue.pop_front() {
        if seen.insert(i) {
            queue.extend(graph[i].iter().map(|nav| nav.target));
        }
    }

    seen.into_iter().map(entity_name).collect()
}

#[derive(Default)]
struct MirrorLog(Mutex<Vec<String>>);

impl PipelineTraceSink for MirrorLog {
    fn on_event(&self, event: PipelineTraceEvent) {
        if let PipelineTraceEvent::EntityMirrored { entity, .. } = event {
            self.0.lock().unwrap().push(entity);
        }
    }
}

// mirror
// worklist output plus the entities in the order they were mirrored
fn mirror(graph: &Graph, seeds: &[usize]) -> (BTreeMap<String, MirroredEntity>, Vec<String>) {
    let model = graph_model(graph);
    let config = GeneratorConfig::default();
    let resolver = ModelResolver::new(&model);
    let log = MirrorLog::default();
    let ctx = MirrorContext::new(&model, &resolver, &config).with_trace(Some(&log));
    let seeds: Vec<EntityRef> = seeds
        .iter()
        .map(|&i| EntityRef::new(entity_name(i)))
        .collect();

    let out = Worklist::new(&ctx).run(&seeds);

    (out, log.0.into_inner().unwrap())
}

fn by_member_name(
    mut out: BTreeMap<String, MirroredEntity>,
) -> BTreeMap<String, MirroredEntity> {
    for entity in out.values_mut() {
        entity.decl.members.sort_by(|a, b| a.name().cmp(b.name()));
    }

    out
}

proptest! {
    #[test]
    fn worklist_mirrors_each_reachable_entity_once(
        (graph, permuted, seeds, shuffled) in arb_case()
    ) {
        let expected = reachable(&graph, &seeds);
        let (baseline, order) = mirror(&graph, &seeds);

        let keys: BTreeSet<String> = baseline.keys().cloned().collect();
        prop_assert_eq!(&keys, &expected);

        let mirrored: BTreeSet<String> = order.iter().cloned().collect();
        prop_assert_eq!(order.len(), mirrored.len());
        prop_assert_eq!(&mirrored, &expected);

        let (reseeded, _) = mirror(&graph, &shuffled);
        prop_assert_eq!(&reseeded, &baseline);

        let (reordered, _) = mirror(&permuted, &shuffled);
        prop_assert_eq!(by_member_name(reordered), by_member_name(baseline));
    }
}
