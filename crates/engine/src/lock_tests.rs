// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn second_acquire_fails_while_held() {
    let temp = tempfile::tempdir().unwrap();

    let lock = InstanceLock::acquire(temp.path()).unwrap();
    assert!(matches!(
        InstanceLock::acquire(temp.path()),
        Err(EngineError::AlreadyRunning(_))
    ));

    drop(lock);
    InstanceLock::acquire(temp.path()).unwrap();
}
