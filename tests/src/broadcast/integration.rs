#![cfg(test)]
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use garp_common::config::{BroadcastPolicy, Config};
use garp_common::error::{CmdError, ResolveError};
use garp_common::network::address::{InterfaceAddress, IpResolver, ResolvingInterfaceAddress, SimpleInterfaceAddress};
use garp_common::system::{CmdOutput, CmdRunner};
use garp_core::arping::{Arping, BroadcastOutcome};
use garp_core::system::{OsFileSystem, ProcessCmdRunner, ThreadSleeper};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct RecordingRunner {
    calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl RecordingRunner {
    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl CmdRunner for RecordingRunner {
    fn run_command(&self, program: &str, args: &[&str]) -> Result<CmdOutput, CmdError> {
        let mut cmd = vec![program.to_string()];
        cmd.extend(args.iter().map(|arg| arg.to_string()));
        self.calls.borrow_mut().push(cmd);
        Ok(CmdOutput::default())
    }
}

/// Hands out a different address on every lookup, like a DHCP lease landing mid-broadcast.
struct LeaseResolver {
    leases: RefCell<Vec<&'static str>>,
}

impl IpResolver for LeaseResolver {
    fn resolve(&self, interface_name: &str) -> Result<std::net::IpAddr, ResolveError> {
        let mut leases = self.leases.borrow_mut();
        if leases.is_empty() {
            return Err(ResolveError::NoIpv4Address(interface_name.to_string()));
        }
        Ok(leases.remove(0).parse().unwrap())
    }
}

fn sysfs_with(interfaces: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in interfaces {
        fs::create_dir(dir.path().join(name)).unwrap();
    }
    dir
}

fn config(sysfs: &Path, policy: BroadcastPolicy) -> Config {
    Config {
        sys_class_net: sysfs.to_path_buf(),
        arping_bin: "arping".to_string(),
        policy,
    }
}

fn arping_cmd(interface: &str, ip: &str) -> Vec<String> {
    ["arping", "-c", "1", "-U", "-I", interface, ip]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn announces_on_present_interface_every_pass() {
    let sysfs = sysfs_with(&["eth0"]);
    let policy = BroadcastPolicy::new(2, Duration::ZERO, Duration::from_millis(10)).unwrap();
    let runner = RecordingRunner::default();
    let arping = Arping::new(runner.clone(), OsFileSystem, ThreadSleeper, &config(sysfs.path(), policy));

    let start = Instant::now();
    arping.broadcast_mac_addresses(&[SimpleInterfaceAddress::new("eth0", "10.0.0.5")]);

    assert_eq!(runner.calls(), vec![arping_cmd("eth0", "10.0.0.5"); 2]);
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[test]
fn waits_for_interface_created_late() {
    let sysfs = sysfs_with(&[]);
    let late_iface = sysfs.path().join("eth1");
    let policy = BroadcastPolicy::new(1, Duration::ZERO, Duration::from_millis(50)).unwrap();
    let runner = RecordingRunner::default();
    let arping = Arping::new(runner.clone(), OsFileSystem, ThreadSleeper, &config(sysfs.path(), policy));

    let start = Instant::now();
    let creator = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        fs::create_dir(late_iface).unwrap();
    });

    arping.broadcast_mac_addresses(&[SimpleInterfaceAddress::new("eth1", "10.0.1.5")]);
    creator.join().unwrap();

    assert!(start.elapsed() >= Duration::from_millis(100));
    assert_eq!(runner.calls(), vec![arping_cmd("eth1", "10.0.1.5")]);
}

#[test]
fn missing_interface_times_out_and_batch_continues() {
    let sysfs = sysfs_with(&["eth0"]);
    let policy = BroadcastPolicy::new(1, Duration::ZERO, Duration::from_millis(20))
        .unwrap()
        .with_interface_timeout(Duration::from_millis(60))
        .unwrap();
    let runner = RecordingRunner::default();
    let arping = Arping::new(runner.clone(), OsFileSystem, ThreadSleeper, &config(sysfs.path(), policy));
    let addresses = vec![
        SimpleInterfaceAddress::new("eth9", "10.0.9.5"),
        SimpleInterfaceAddress::new("eth0", "10.0.0.5"),
    ];

    let start = Instant::now();
    arping.broadcast_mac_addresses(&addresses);

    assert!(start.elapsed() >= Duration::from_millis(60));
    assert_eq!(runner.calls(), vec![arping_cmd("eth0", "10.0.0.5")]);
}

#[test]
fn resolving_address_picks_up_new_lease_between_passes() {
    let sysfs = sysfs_with(&["eth0"]);
    let policy = BroadcastPolicy::new(3, Duration::ZERO, Duration::from_millis(10)).unwrap();
    let runner = RecordingRunner::default();
    let arping = Arping::new(runner.clone(), OsFileSystem, ThreadSleeper, &config(sysfs.path(), policy));
    let address = ResolvingInterfaceAddress::new(
        "eth0",
        LeaseResolver {
            leases: RefCell::new(vec!["10.0.0.5", "10.0.0.6"]),
        },
    );

    arping.broadcast_mac_addresses(&[address]);

    // Third pass finds no lease left and is skipped.
    assert_eq!(
        runner.calls(),
        vec![arping_cmd("eth0", "10.0.0.5"), arping_cmd("eth0", "10.0.0.6")]
    );
}

#[test]
fn mixed_address_kinds_in_one_batch() {
    let sysfs = sysfs_with(&["eth0", "eth1"]);
    let policy = BroadcastPolicy::new(1, Duration::ZERO, Duration::from_millis(10)).unwrap();
    let runner = RecordingRunner::default();
    let arping = Arping::new(runner.clone(), OsFileSystem, ThreadSleeper, &config(sysfs.path(), policy));
    let addresses: Vec<Box<dyn InterfaceAddress>> = vec![
        Box::new(ResolvingInterfaceAddress::new(
            "eth0",
            LeaseResolver {
                leases: RefCell::new(Vec::new()),
            },
        )),
        Box::new(SimpleInterfaceAddress::new("eth1", "10.0.1.5")),
    ];

    arping.broadcast_mac_addresses(&addresses);

    assert_eq!(runner.calls(), vec![arping_cmd("eth1", "10.0.1.5")]);
}

#[test]
#[cfg(unix)]
fn runs_real_arping_executable_with_expected_arguments() {
    use std::os::unix::fs::PermissionsExt;

    let sysfs = sysfs_with(&["eth0"]);
    let bin_dir = tempfile::tempdir().unwrap();
    let record = bin_dir.path().join("calls.txt");
    let script = bin_dir.path().join("arping");
    fs::write(
        &script,
        format!("#!/bin/sh\necho \"$@\" >> {}\n", record.display()),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let cfg = Config {
        sys_class_net: sysfs.path().to_path_buf(),
        arping_bin: script.display().to_string(),
        policy: BroadcastPolicy::new(2, Duration::from_millis(5), Duration::from_millis(10)).unwrap(),
    };
    let arping = Arping::new(ProcessCmdRunner, OsFileSystem, ThreadSleeper, &cfg);

    arping.broadcast_mac_addresses(&[SimpleInterfaceAddress::new("eth0", "10.0.0.5")]);

    let calls = fs::read_to_string(&record).unwrap();
    assert_eq!(calls, "-c 1 -U -I eth0 10.0.0.5\n-c 1 -U -I eth0 10.0.0.5\n");
}

#[test]
#[cfg(unix)]
fn failing_executable_is_reported_as_announcement_failure() {
    let sysfs = sysfs_with(&["eth0"]);
    let cfg = Config {
        sys_class_net: sysfs.path().to_path_buf(),
        arping_bin: "false".to_string(),
        policy: BroadcastPolicy::new(2, Duration::ZERO, Duration::from_millis(10)).unwrap(),
    };
    let arping = Arping::from_config(&cfg);

    let outcome = arping.broadcast_mac_address(&SimpleInterfaceAddress::new("eth0", "10.0.0.5"));
    assert!(matches!(outcome, BroadcastOutcome::Failed(_)), "got {outcome:?}");

    // The whole broadcast still completes.
    arping.broadcast_mac_addresses(&[SimpleInterfaceAddress::new("eth0", "10.0.0.5")]);
}
