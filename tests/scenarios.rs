use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use forest::builder::MachineBuilder;
use forest::context::Context;
use forest::machine::MachineInstance;
use forest::transit::{TransitNone, TransitResult1, TransitResult2};

type Log = Rc<RefCell<Vec<String>>>;

fn record(ctx: &Context<'_, Log>, name: &str, action: &str) {
    ctx.storage().borrow_mut().push(format!("{action} {name}"));
}

macro_rules! logging_state {
    ($name:ident) => {
        #[derive(Default)]
        struct $name;

        impl forest::state::StateRecord<Log> for $name {
            fn enter(&mut self, ctx: &mut Context<'_, Log>) {
                record(ctx, stringify!($name), "enter");
            }
            fn exit(&mut self, ctx: &mut Context<'_, Log>) {
                record(ctx, stringify!($name), "exit");
            }
            fn reenter(&mut self, ctx: &mut Context<'_, Log>) {
                record(ctx, stringify!($name), "reenter");
            }
        }
    };
}

mod linear_toggle {
    use super::*;

    logging_state!(Root);
    logging_state!(A);
    logging_state!(B);

    struct E1 {
        value: bool,
    }

    #[test]
    fn linear_toggle() {
        let mut builder = MachineBuilder::<Log>::new("Root\n|-- A\n|-- B\n").unwrap();
        builder.bind::<Root>("Root").unwrap();
        builder.bind::<A>("A").unwrap();
        builder.bind::<B>("B").unwrap();
        builder.on_reaction::<Root, E1, TransitResult2<A, B>, _>(|_, _, e| {
            if e.value { TransitResult2::to_a() } else { TransitResult2::to_b() }
        });
        builder.on_reaction::<A, E1, TransitResult1<B>, _>(|_, _, _| TransitResult1::to_a());
        builder.on_reaction::<B, E1, TransitResult1<A>, _>(|_, _, _| TransitResult1::to_a());
        let def = Arc::new(builder.build().unwrap());

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut machine = MachineInstance::new(def, log.clone());

        machine.start();
        machine.react(E1 { value: true }).unwrap();
        machine.react(E1 { value: false }).unwrap();
        machine.stop();

        assert_eq!(
            *log.borrow(),
            vec!["enter Root", "enter A", "exit A", "enter B", "exit B", "exit Root"]
        );
    }
}

mod orthogonal_region {
    use super::*;

    #[derive(Default)]
    struct Root;
    impl forest::state::StateRecord<Counters> for Root {}

    #[derive(Default)]
    struct A;
    impl forest::state::StateRecord<Counters> for A {}

    #[derive(Default)]
    struct B;
    impl forest::state::StateRecord<Counters> for B {}

    #[derive(Default)]
    struct Counters {
        a_counter: u32,
        b_counter: u32,
    }

    struct E1;
    struct E2;

    #[test]
    fn orthogonal_region() {
        let mut builder = MachineBuilder::<Counters>::new("[Root]\n|-- A\n|-- B\n").unwrap();
        builder.bind::<Root>("Root").unwrap();
        builder.bind::<A>("A").unwrap();
        builder.bind::<B>("B").unwrap();
        builder.on_reaction::<A, E1, TransitNone, _>(|_, ctx, _| {
            ctx.storage_mut().a_counter += 1;
            TransitNone
        });
        builder.on_reaction::<B, E2, TransitNone, _>(|_, ctx, _| {
            ctx.storage_mut().b_counter += 1;
            TransitNone
        });
        let def = Arc::new(builder.build().unwrap());
        let mut machine = MachineInstance::new(def, Counters::default());

        machine.start();
        assert!(machine.is_active_type::<Root>());
        assert!(machine.is_active_type::<A>());
        assert!(machine.is_active_type::<B>());

        machine.react(E1).unwrap();
        machine.react(E2).unwrap();

        assert_eq!(machine.storage().a_counter, 1);
        assert_eq!(machine.storage().b_counter, 1);
        assert!(machine.is_active_type::<Root>());
        assert!(machine.is_active_type::<A>());
        assert!(machine.is_active_type::<B>());

        machine.stop();
    }
}

mod reenter {
    use super::*;

    logging_state!(Root);
    logging_state!(A);
    logging_state!(B);

    struct E1 {
        value: bool,
    }

    #[test]
    fn reenter_on_self_transition() {
        let mut builder = MachineBuilder::<Log>::new("Root\n|-- A\n|-- B\n").unwrap();
        builder.bind::<Root>("Root").unwrap();
        builder.bind::<A>("A").unwrap();
        builder.bind::<B>("B").unwrap();
        // Only Root reacts; since the registration fans out over Root's
        // whole subtree, it also answers when A or B is the active leaf,
        // producing a reenter whenever the requested target is already active.
        builder.on_reaction::<Root, E1, TransitResult2<A, B>, _>(|_, _, e| {
            if e.value { TransitResult2::to_a() } else { TransitResult2::to_b() }
        });
        let def = Arc::new(builder.build().unwrap());

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut machine = MachineInstance::new(def, log.clone());

        machine.start();
        machine.react(E1 { value: true }).unwrap();
        machine.react(E1 { value: true }).unwrap();
        machine.react(E1 { value: false }).unwrap();
        machine.react(E1 { value: false }).unwrap();
        machine.stop();

        let counts = |name: &str, action: &str| log.borrow().iter().filter(|l| **l == format!("{action} {name}")).count();

        assert_eq!(counts("Root", "enter"), 1);
        assert_eq!(counts("Root", "reenter"), 0);
        assert_eq!(counts("Root", "exit"), 1);
        assert_eq!(counts("A", "enter"), 1);
        assert_eq!(counts("A", "reenter"), 1);
        assert_eq!(counts("A", "exit"), 1);
        assert_eq!(counts("B", "enter"), 1);
        assert_eq!(counts("B", "reenter"), 1);
        assert_eq!(counts("B", "exit"), 1);
    }
}

mod cross_subtree_transition {
    use super::*;

    logging_state!(Root);
    logging_state!(P);
    logging_state!(A);
    logging_state!(B);
    logging_state!(Q);
    logging_state!(C);

    struct Begin;
    struct CrossEvent;

    #[test]
    fn cross_subtree_lca_transition() {
        let text = "Root\n|-- P\n|   |-- A\n|   |-- B\n|-- Q\n|   |-- C\n";
        let mut builder = MachineBuilder::<Log>::new(text).unwrap();
        builder.bind::<Root>("Root").unwrap();
        builder.bind::<P>("P").unwrap();
        builder.bind::<A>("A").unwrap();
        builder.bind::<B>("B").unwrap();
        builder.bind::<Q>("Q").unwrap();
        builder.bind::<C>("C").unwrap();
        builder.on_reaction::<Root, Begin, TransitResult1<P>, _>(|_, _, _| TransitResult1::to_a());
        builder.on_reaction::<P, Begin, TransitResult1<A>, _>(|_, _, _| TransitResult1::to_a());
        builder.on_reaction::<A, CrossEvent, TransitResult1<C>, _>(|_, _, _| TransitResult1::to_a());
        let def = Arc::new(builder.build().unwrap());

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut machine = MachineInstance::new(def, log.clone());

        machine.start();
        machine.react(Begin).unwrap();
        machine.react(Begin).unwrap();
        log.borrow_mut().clear();

        machine.react(CrossEvent).unwrap();

        assert_eq!(*log.borrow(), vec!["exit A", "exit P", "enter Q", "enter C"]);
        assert!(machine.is_active_type::<Root>());
        assert!(!machine.is_active_type::<B>());
    }
}
