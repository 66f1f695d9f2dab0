//! Test fixtures for common test data
//!
//! Fixtures are canned reports shaped like the ones real agents submit,
//! Ruby tags included.

/// Canned report documents
pub struct ReportFixtures;

impl ReportFixtures {
    /// A run that changed one file and reported two log lines
    pub fn changed() -> &'static str {
        r#"--- !ruby/object:Puppet::Transaction::Report
metrics:
  resources: !ruby/object:Puppet::Util::Metric
    name: resources
    label: Resources
    values:
    - - total
      - Total
      - 54
    - - skipped
      - Skipped
      - 0
    - - failed
      - Failed
      - 0
    - - failed_to_restart
      - Failed to restart
      - 0
    - - restarted
      - Restarted
      - 0
    - - changed
      - Changed
      - 1
    - - out_of_sync
      - Out of sync
      - 1
    - - scheduled
      - Scheduled
      - 0
  time: !ruby/object:Puppet::Util::Metric
    name: time
    label: Time
    values:
    - - file
      - File
      - 0.095412
    - - config_retrieval
      - Config retrieval
      - 2.13
    - - total
      - Total
      - 3.71
  changes: !ruby/object:Puppet::Util::Metric
    name: changes
    label: Changes
    values:
    - - total
      - Total
      - 1
logs:
- !ruby/object:Puppet::Util::Log
  level: !ruby/sym info
  message: Using cached certificate for web01.example.com
  source: Puppet
  tags:
  - info
  time: '2018-03-01T09:57:43.501Z'
- !ruby/object:Puppet::Util::Log
  level: !ruby/sym notice
  message: "content changed '{md5}d41d8cd98f00b204e9800998ecf8427e' to '{md5}3b5d5c3712955042212316173ccf37be'"
  source: "/Stage[main]/Motd/File[/etc/motd]/content"
  tags:
  - notice
  - file
  time: '2018-03-01T09:57:46.120Z'
  file: /etc/puppetlabs/code/environments/production/modules/motd/manifests/init.pp
  line: 7
resource_statuses:
  "File[/etc/motd]": !ruby/object:Puppet::Resource::Status
    title: /etc/motd
    file: /etc/puppetlabs/code/environments/production/modules/motd/manifests/init.pp
    line: 7
    resource: "File[/etc/motd]"
    resource_type: File
    containment_path:
    - Stage[main]
    - Motd
    - File[/etc/motd]
    evaluation_time: 0.0124
    tags:
    - file
    - class
    failed: false
    changed: true
    out_of_sync: true
    skipped: false
    change_count: 1
    out_of_sync_count: 1
    events: []
  "Package[ntp]": !ruby/object:Puppet::Resource::Status
    title: ntp
    file: /etc/puppetlabs/code/environments/production/modules/ntp/manifests/install.pp
    line: 3
    resource: "Package[ntp]"
    resource_type: Package
    failed: false
    changed: false
    out_of_sync: false
    skipped: false
    events: []
host: web01.example.com
time: '2018-03-01T09:57:42.914533153+00:00'
configuration_version: 1519898262
transaction_uuid: 6c2f1a0e-6a4b-4a46-9f6d-2b0c4e5d1a77
report_format: 6
puppet_version: 5.4.0
status: changed
transaction_completed: true
noop: false
environment: production
"#
    }

    /// A failed run where one service both failed and was skipped
    pub fn failed() -> &'static str {
        r#"--- !ruby/object:Puppet::Transaction::Report
metrics:
  resources: !ruby/object:Puppet::Util::Metric
    name: resources
    values:
    - - total
      - Total
      - 12
    - - failed
      - Failed
      - 1
    - - skipped
      - Skipped
      - 1
    - - changed
      - Changed
      - 0
  time: !ruby/object:Puppet::Util::Metric
    name: time
    values:
    - - total
      - Total
      - 14.02
logs:
- !ruby/object:Puppet::Util::Log
  level: !ruby/sym err
  message: "Could not start Service[ntpd]: Execution of '/bin/systemctl start ntpd' returned 1"
  source: "/Stage[main]/Ntp/Service[ntpd]"
- !ruby/object:Puppet::Util::Log
  level: !ruby/sym notice
  message: Applied catalog in 14.02 seconds
  source: Puppet
resource_statuses:
  "Service[ntpd]": !ruby/object:Puppet::Resource::Status
    title: ntpd
    file: /etc/puppetlabs/code/environments/staging/modules/ntp/manifests/service.pp
    line: 11
    resource_type: Service
    failed: true
    changed: false
    skipped: true
host: db01.example.com
time: "'2018-03-02 10:15:00 +0100'"
status: failed
environment: staging
"#
    }
}
