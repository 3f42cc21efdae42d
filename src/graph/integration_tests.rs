// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// End-to-end pipeline tests under local and pooled engines
#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use std::time::Duration;
    use thiserror::Error;

    use crate::engine::Engine;
    use crate::errors::ExecutionError;
    use crate::observability::capture::span_names;
    use crate::graph::{
        ComputedSource, FullStream, Input, Join, OutputNode, Source, Summarize, Zip,
    };
    use crate::traits::{Stream, Work};

    #[derive(Debug, Error, PartialEq)]
    #[error("{0}")]
    struct ValueError(String);

    fn int(value: &Value) -> i64 {
        value.as_i64().unwrap_or_default()
    }

    /// Identity that sleeps longer for earlier positions, so pooled
    /// completions arrive roughly in reverse order.
    fn jittered_identity(count: i64) -> Work {
        Work::new("jitter", move |mut args| {
            let value = args.remove(0);
            let delay = (count - int(&value)).max(0) as u64;
            std::thread::sleep(Duration::from_millis(delay * 3));
            Ok(value)
        })
    }

    fn fail_at(position: i64, message: &'static str) -> Work {
        Work::new("fail_at", move |mut args| {
            let value = args.remove(0);
            if int(&value) == position {
                return Err(ValueError(message.to_string()).into());
            }
            Ok(value)
        })
    }

    fn pooled() -> Engine {
        Engine::with_workers(4)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_source_order_survives_pooled_execution() {
        let n = 16;
        let source = Source::new((0..n).map(|i| json!(i)).collect());
        let shuffled = Zip::new(jittered_identity(n), vec![Input::from(source)]).unwrap();

        let values = OutputNode::new(Input::from(shuffled))
            .values(&pooled())
            .await
            .unwrap();
        assert_eq!(values, (0..n).map(|i| json!(i)).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_plain_source_output_in_order() {
        let values = OutputNode::new(Input::collection([5, 3, 9, 1]))
            .values(&Engine::local())
            .await
            .unwrap();
        assert_eq!(values, vec![json!(5), json!(3), json!(9), json!(1)]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_repeated_pooled_runs_are_identical() {
        async fn run_once() -> Vec<Value> {
            let square = Work::new("square", |args| Ok(json!(int(&args[0]) * int(&args[0]))));
            let xs = Source::new((0..12).map(|i| json!(i)).collect());
            let jittered = Zip::new(jittered_identity(12), vec![Input::from(xs)]).unwrap();
            let squared = Zip::new(square, vec![Input::from(jittered)]).unwrap();
            OutputNode::new(Input::from(squared))
                .values(&Engine::with_workers(4))
                .await
                .unwrap()
        }

        let first = run_once().await;
        let second = run_once().await;
        assert_eq!(first, second);
        assert_eq!(first[11], json!(121));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_zip_broadcasts_constant_input() {
        let weighted = Work::new("weighted", |args| {
            Ok(json!(int(&args[0]) * int(&args[1]) + int(&args[2])))
        });
        let a: Vec<i64> = vec![1, 2, 3, 4, 5];
        let b: Vec<i64> = vec![10, 20, 30, 40, 50];

        let zip = Zip::new(
            weighted,
            vec![
                Input::scalar(7),
                Input::collection(a.clone()),
                Input::collection(b.clone()),
            ],
        )
        .unwrap();
        assert_eq!(zip.size(), 5);

        let values = OutputNode::new(Input::from(zip)).values(&pooled()).await.unwrap();
        for p in 0..5 {
            assert_eq!(values[p], json!(7 * a[p] + b[p]));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_zip_failure_is_isolated_to_its_position() {
        let add = Work::new("add", |args| Ok(json!(int(&args[0]) + int(&args[1]))));
        let left = Zip::new(fail_at(3, "bad left"), vec![Input::collection(0..5)]).unwrap();
        let right = Source::new((0..5).map(|i| json!(i * 100)).collect());
        let zip = Zip::new(add, vec![Input::from(left), Input::from(right)]).unwrap();

        let results = OutputNode::new(Input::from(zip))
            .run(&pooled(), false)
            .await
            .unwrap();

        assert_eq!(results.len(), 5);
        for p in [0usize, 1, 2, 4] {
            assert_eq!(results[p].as_ref().unwrap(), &json!(p as i64 * 101));
        }
        let failure = results[3].as_ref().unwrap_err();
        assert_eq!(failure.downcast_ref::<ValueError>(), Some(&ValueError("bad left".into())));
        assert_eq!(failure.position(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_join_uses_mixed_radix_order() {
        let pair = Work::new("pair", |args| Ok(json!([args[0], args[1]])));
        let a = Zip::new(jittered_identity(2), vec![Input::collection([0, 1])]).unwrap();
        let b = Source::new(vec![json!("x"), json!("y"), json!("z")]);
        let join = Join::new(pair, vec![Input::from(a), Input::from(b)]).unwrap();
        assert_eq!(join.size(), 6);

        let values = OutputNode::new(Input::from(join)).values(&pooled()).await.unwrap();
        let bs = ["x", "y", "z"];
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(values[i * 3 + j], json!([i, bs[j]]));
            }
        }
    }

    #[tokio::test]
    async fn test_summarize_keeps_original_order() {
        let identity = Work::new("identity", |mut args| Ok(args.remove(0)));
        let summary = Summarize::new(identity, Input::collection([3, 1, 2])).unwrap();

        let values = OutputNode::new(Input::from(summary))
            .values(&Engine::local())
            .await
            .unwrap();
        assert_eq!(values, vec![json!([3, 1, 2])]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_summarize_restores_order_after_pooled_stage() {
        let n = 10;
        let identity = Work::new("identity", |mut args| Ok(args.remove(0)));
        let shuffled = Zip::new(jittered_identity(n), vec![Input::collection(0..n)]).unwrap();
        let summary = Summarize::new(identity, Input::from(shuffled)).unwrap();

        let values = OutputNode::new(Input::from(summary)).values(&pooled()).await.unwrap();
        assert_eq!(values, vec![json!((0..n).collect::<Vec<_>>())]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_full_stream_doubles_every_position() {
        let n = 8;
        let double_all = Work::new("double_all", |args| {
            let values = args[0].as_array().cloned().unwrap_or_default();
            Ok(json!(values.iter().map(|v| int(v) * 2).collect::<Vec<_>>()))
        });
        let stream = FullStream::new(double_all, Input::collection(0..n)).unwrap();
        assert_eq!(stream.size(), n as usize);

        let values = OutputNode::new(Input::from(stream)).values(&pooled()).await.unwrap();
        for i in 0..n {
            assert_eq!(values[i as usize], json!(i * 2));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pooled_failure_strict_and_lenient() {
        let build = || {
            let stage = Zip::new(fail_at(2, "boom"), vec![Input::collection(0..5)]).unwrap();
            OutputNode::new(Input::from(stage))
        };

        let err = build().run(&pooled(), true).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        let failure = err.failure().unwrap();
        assert_eq!(failure.downcast_ref::<ValueError>(), Some(&ValueError("boom".into())));

        let results = build().run(&pooled(), false).await.unwrap();
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
        assert!(results[2].is_err());
        assert_eq!(results[4].as_ref().unwrap(), &json!(4));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_strict_reraises_lowest_position_first() {
        // Position 4 fails immediately, position 1 fails late
        let flaky = Work::new("flaky", |args| {
            let x = int(&args[0]);
            match x {
                1 => {
                    std::thread::sleep(Duration::from_millis(40));
                    Err(ValueError("first".into()).into())
                }
                4 => Err(ValueError("second".into()).into()),
                _ => Ok(json!(x)),
            }
        });
        let stage = Zip::new(flaky, vec![Input::collection(0..6)]).unwrap();

        let err = OutputNode::new(Input::from(stage))
            .run(&pooled(), true)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "first");
    }

    #[tokio::test]
    async fn test_failure_flows_through_chain_and_summary() {
        let stage = Zip::new(fail_at(1, "upstream broke"), vec![Input::collection(0..4)]).unwrap();
        let untouched = Zip::new(
            Work::new("plus_one", |args| Ok(json!(int(&args[0]) + 1))),
            vec![Input::from(stage)],
        )
        .unwrap();
        let summary = Summarize::new(
            Work::new("never_called", |_| panic!("summary must be skipped")),
            Input::from(untouched),
        )
        .unwrap();

        let err = OutputNode::new(Input::from(summary))
            .values(&Engine::local())
            .await
            .unwrap_err();
        match err {
            ExecutionError::Failed(failure) => {
                assert_eq!(failure.to_string(), "upstream broke");
                assert!(failure.node().starts_with("fail_at#"));
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_diamond_shares_one_source() {
        let xs = Source::new((1..=4).map(|i| json!(i)).collect());
        let doubled = Zip::new(
            Work::new("double", |args| Ok(json!(int(&args[0]) * 2))),
            vec![Input::from(xs.clone())],
        )
        .unwrap();
        let squared = Zip::new(
            Work::new("square", |args| Ok(json!(int(&args[0]) * int(&args[0])))),
            vec![Input::from(xs)],
        )
        .unwrap();
        let merged = Zip::new(
            Work::new("sum", |args| Ok(json!(int(&args[0]) + int(&args[1])))),
            vec![Input::from(doubled), Input::from(squared)],
        )
        .unwrap();

        let values = OutputNode::new(Input::from(merged)).values(&pooled()).await.unwrap();
        assert_eq!(values, vec![json!(3), json!(8), json!(15), json!(24)]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parameter_sweep_with_local_and_debug_nodes() {
        let rates = ComputedSource::new("rates", || Ok((1..=3).map(|r| json!(r)).collect())).unwrap();
        let scaled = Join::new(
            Work::new("scale", |args| Ok(json!(int(&args[0]) * int(&args[1])))).debug(),
            vec![Input::from(rates), Input::collection([10, 100])],
        )
        .unwrap();
        let total = Summarize::new(
            Work::new("total", |args| {
                let values = args[0].as_array().cloned().unwrap_or_default();
                Ok(json!(values.iter().map(int).sum::<i64>()))
            })
            .local(),
            Input::from(scaled),
        )
        .unwrap();

        let values = OutputNode::new(Input::from(total)).values(&pooled()).await.unwrap();
        // (1 + 2 + 3) * (10 + 100)
        assert_eq!(values, vec![json!(660)]);
    }

    #[test]
    fn test_node_production_and_work_run_inside_spans() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let (values, names) = span_names(|| {
            runtime.block_on(async {
                let inc = Zip::new(
                    Work::new("inc", |args| Ok(json!(int(&args[0]) + 1))),
                    vec![Input::collection([1, 2])],
                )
                .unwrap();
                OutputNode::new(Input::from(inc))
                    .values(&Engine::local())
                    .await
                    .unwrap()
            })
        });

        assert_eq!(values, vec![json!(2), json!(3)]);
        assert!(names.iter().any(|name| name == "node:emit"));
        assert!(names.iter().any(|name| name == "node:produce"));
        assert_eq!(names.iter().filter(|name| *name == "task:run").count(), 2);
    }

    #[tokio::test]
    async fn test_mismatched_zip_surfaces_from_output_run() {
        let zip = Zip::new(
            Work::new("add", |args| Ok(json!(int(&args[0]) + int(&args[1])))),
            vec![Input::collection([1, 2]), Input::collection([1, 2, 3])],
        )
        .unwrap();

        let err = OutputNode::new(Input::from(zip))
            .run(&Engine::local(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Graph(_)));
        assert!(err.to_string().contains("mismatched"));
    }
}
