use bson::Bson;
use mongo_bulk::bulk::{BulkOperation, Hint, ServerExecutor};
use mongo_bulk::common::WriteConcern;
use mongo_bulk::Error;
use std::io;

use super::{get_i32, init_logging, ScriptedRunner};

fn ok(n: i32) -> Result<::bson::Document, Error> {
    Ok(doc! { "ok": 1.0, "n": n })
}

#[test]
fn basic_bulk() {
    init_logging();
    let mut bulk = BulkOperation::new("test", "test_bulk", Hint::none(), true, None);

    for _ in 0..4 {
        bulk.insert(doc! {}).unwrap();
    }
    bulk.update(doc! {}, doc! { "$set": { "hello": 123 } }, false).unwrap();
    bulk.remove(doc! { "hello": 123 }).unwrap();

    let runner = ScriptedRunner::new(vec![ok(1),
                                          ok(1),
                                          ok(1),
                                          ok(1),
                                          Ok(doc! { "ok": 1.0, "n": 4, "nModified": 4 }),
                                          ok(4)]);
    let mut executor = ServerExecutor::new(runner);

    let reply = bulk.execute(&mut executor).into_result().unwrap();

    assert_eq!(get_i32(&reply, "nInserted"), 4);
    assert_eq!(get_i32(&reply, "nMatched"), 4);
    assert_eq!(get_i32(&reply, "nModified"), 4);
    assert_eq!(get_i32(&reply, "nRemoved"), 4);
    assert_eq!(get_i32(&reply, "nUpserted"), 0);

    let runner = executor.into_runner();
    assert_eq!(runner.commands.len(), 6);
    assert!(runner.commands.iter().all(|&(ref db, _, _)| db == "test"));

    let (_, ref remove, _) = runner.commands[5];
    assert_eq!(remove.get_str("delete").unwrap(), "test_bulk");
    match remove.get_array("deletes").unwrap()[0] {
        Bson::Document(ref statement) => assert_eq!(statement.get_i32("limit").unwrap(), 0),
        ref other => panic!("Expected delete statement, got {:?}", other),
    }
}

#[test]
fn update_upserted() {
    let mut bulk = BulkOperation::new("test", "test_update_upserted", Hint::none(), true, None);
    bulk.update(doc! { "abcd": 1234 }, doc! { "$set": { "hello": "there" } }, true).unwrap();

    let reply = doc! {
        "ok": 1.0,
        "n": 1,
        "nModified": 0,
        "upserted": [{ "index": 0, "_id": "generated" }]
    };
    let mut executor = ServerExecutor::new(ScriptedRunner::new(vec![Ok(reply)]));

    let reply = bulk.execute(&mut executor).into_result().unwrap();

    assert_eq!(get_i32(&reply, "nUpserted"), 1);
    assert_eq!(get_i32(&reply, "nMatched"), 0);
    assert_eq!(get_i32(&reply, "nRemoved"), 0);
    assert_eq!(get_i32(&reply, "nInserted"), 0);
    assert_eq!(get_i32(&reply, "nModified"), 0);
    assert_eq!(reply.get_array("upserted").unwrap().len(), 1);
    assert!(reply.get_array("writeErrors").unwrap().is_empty());
}

#[test]
fn index_offset() {
    let mut bulk = BulkOperation::new("test", "test_index_offset", Hint::none(), true, None);
    bulk.remove_one(doc! { "abcd": 1234 }).unwrap();
    bulk.update(doc! { "abcd": 1234 }, doc! { "$set": { "hello": "there" } }, true).unwrap();

    let upsert_reply = doc! {
        "ok": 1.0,
        "n": 1,
        "nModified": 0,
        "upserted": [{ "index": 0, "_id": "generated" }]
    };
    let runner = ScriptedRunner::new(vec![ok(1), Ok(upsert_reply)]);
    let mut executor = ServerExecutor::new(runner);

    let reply = bulk.execute(&mut executor).into_result().unwrap();

    assert_eq!(get_i32(&reply, "nUpserted"), 1);
    assert_eq!(get_i32(&reply, "nRemoved"), 1);
    assert_eq!(get_i32(&reply, "nMatched"), 0);

    match reply.get_array("upserted").unwrap()[0] {
        Bson::Document(ref upserted) => {
            assert_eq!(upserted.get_i32("index").unwrap(), 1);
            assert_eq!(upserted.get_str("_id").unwrap(), "generated");
        }
        ref other => panic!("Expected upserted document, got {:?}", other),
    }
}

#[test]
fn server_hint_is_reused() {
    let mut bulk = BulkOperation::new("test", "test_hint", Hint::none(), true, None);
    bulk.insert(doc! {}).unwrap();
    bulk.insert(doc! {}).unwrap();

    let mut executor = ServerExecutor::new(ScriptedRunner::new(vec![ok(1), ok(1)]));
    bulk.execute(&mut executor).into_result().unwrap();

    let hints: Vec<_> = executor.runner().commands.iter().map(|&(_, _, hint)| hint).collect();
    assert_eq!(hints, vec![Hint::none(), Hint::from(42)]);
    assert_eq!(bulk.hint(), Hint::from(42));
}

#[test]
fn ordered_write_error_stops_bulk() {
    let mut bulk = BulkOperation::new("test", "test_write_error", Hint::none(), true, None);
    bulk.insert(doc! { "_id": 1 }).unwrap();
    bulk.insert(doc! { "_id": 1 }).unwrap();
    bulk.insert(doc! { "_id": 2 }).unwrap();

    let duplicate = doc! {
        "ok": 1.0,
        "n": 0,
        "writeErrors": [{ "index": 0, "code": 11000, "errmsg": "E11000 duplicate key error" }]
    };
    let runner = ScriptedRunner::new(vec![ok(1), Ok(duplicate), ok(1)]);
    let mut executor = ServerExecutor::new(runner);

    let outcome = bulk.execute(&mut executor);

    assert_eq!(executor.runner().commands.len(), 2);
    assert_eq!(get_i32(&outcome.reply, "nInserted"), 1);
    assert_eq!(outcome.error.as_ref().and_then(|e| e.code()), Some(11000));

    match outcome.reply.get_array("writeErrors").unwrap()[0] {
        Bson::Document(ref error) => {
            assert_eq!(error.get_i32("index").unwrap(), 1);
            assert_eq!(error.get_i32("code").unwrap(), 11000);
        }
        ref other => panic!("Expected write error, got {:?}", other),
    }
}

#[test]
fn transport_failure_is_recorded_and_unordered_continues() {
    let mut bulk = BulkOperation::new("test", "test_transport", Hint::none(), false, None);
    bulk.insert(doc! {}).unwrap();
    bulk.remove(doc! {}).unwrap();

    let broken = Err(Error::IoError(io::Error::new(io::ErrorKind::ConnectionReset, "reset")));
    let mut executor = ServerExecutor::new(ScriptedRunner::new(vec![broken, ok(3)]));

    let outcome = bulk.execute(&mut executor);

    let runner = executor.into_runner();
    assert_eq!(runner.commands.len(), 2);
    // The failed dispatch gives up its server affinity.
    assert_eq!(runner.commands[1].2, Hint::none());

    assert_eq!(get_i32(&outcome.reply, "nInserted"), 0);
    assert_eq!(get_i32(&outcome.reply, "nRemoved"), 3);
    match outcome.error {
        Some(Error::BulkWriteError(ref exception)) => {
            assert_eq!(exception.write_errors.len(), 1);
            assert_eq!(exception.write_errors[0].index, 0);
            assert_eq!(exception.write_errors[0].message, "reset");
        }
        ref other => panic!("Expected BulkWriteError, got {:?}", other),
    }
}

#[test]
fn write_concern_error_does_not_halt_ordered_bulk() {
    let mut bulk = BulkOperation::new("test", "test_wc_error", Hint::none(), true, None);
    bulk.insert(doc! {}).unwrap();
    bulk.insert(doc! {}).unwrap();

    let wc_error = doc! {
        "ok": 1.0,
        "n": 1,
        "writeConcernError": { "code": 64, "errmsg": "waiting for replication timed out" }
    };
    let mut executor = ServerExecutor::new(ScriptedRunner::new(vec![Ok(wc_error), ok(1)]));

    let outcome = bulk.execute(&mut executor);

    assert_eq!(executor.runner().commands.len(), 2);
    assert_eq!(get_i32(&outcome.reply, "nInserted"), 2);
    assert!(outcome.reply.get_array("writeErrors").unwrap().is_empty());
    assert_eq!(outcome.reply.get_array("writeConcernErrors").unwrap().len(), 1);
    assert!(!outcome.is_success());
}

#[test]
fn command_failure_is_recorded() {
    let mut bulk = BulkOperation::new("test", "test_command_failure", Hint::none(), true, None);
    bulk.update_one(doc! {}, doc! { "$bogus": { "a": 1 } }, false).unwrap();
    bulk.insert(doc! {}).unwrap();

    let failure = doc! { "ok": 0.0, "code": 9, "errmsg": "Unknown modifier: $bogus" };
    let mut executor = ServerExecutor::new(ScriptedRunner::new(vec![Ok(failure)]));

    let outcome = bulk.execute(&mut executor);

    assert_eq!(executor.runner().commands.len(), 1);
    assert_eq!(outcome.error.as_ref().and_then(|e| e.code()), Some(9));
}

#[test]
fn unacknowledged_writes_skip_reply() {
    let wc = WriteConcern::unacknowledged();
    let mut bulk = BulkOperation::new("test", "test_unacknowledged", Hint::none(), true, Some(wc));
    bulk.insert(doc! {}).unwrap();

    let mut executor = ServerExecutor::new(ScriptedRunner::new(vec![Ok(doc! {})]));
    let outcome = bulk.execute(&mut executor);
    assert!(!outcome.acknowledged);

    let reply = outcome.into_result().unwrap();
    assert_eq!(get_i32(&reply, "nInserted"), 0);

    let runner = executor.into_runner();
    let (_, ref command, _) = runner.commands[0];
    assert_eq!(command.get_document("writeConcern").unwrap().get_i32("w").unwrap(), 0);
}
