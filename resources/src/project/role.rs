// Copyright (c) The Plinth Authors. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use plinth_common::intrinsic::{bucket_arn, join, reference, Reference, AWS_ACCOUNT_ID, AWS_PARTITION, AWS_REGION};
use serde_json::{json, Value};

use crate::ResourceDescription;

const ROLE_TYPE: &str = "AWS::IAM::Role";
const POLICY_TYPE: &str = "AWS::IAM::Policy";
const SERVICE_PRINCIPAL: &str = "codebuild.amazonaws.com";
const POLICY_VERSION: &str = "2012-10-17";

/// The role a project runs as.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ServiceRole {
    /// An existing role, given by ARN.
    Existing(Reference),
    /// A role created together with the project, and its inline policy.
    Owned { role_id: String, policy_id: String },
}

impl ServiceRole {
    pub fn arn(&self) -> Value {
        match self {
            ServiceRole::Existing(arn) => arn.as_value().clone(),
            ServiceRole::Owned { role_id, .. } => Reference::attribute(role_id.as_str(), "Arn").into_value(),
        }
    }
}

/// Returns the role trusted by the build service.
pub(crate) fn role() -> ResourceDescription {
    ResourceDescription::new(ROLE_TYPE).with(
        "AssumeRolePolicyDocument",
        json!({
            "Statement": [{
                "Action": "sts:AssumeRole",
                "Effect": "Allow",
                "Principal": { "Service": SERVICE_PRINCIPAL },
            }],
            "Version": POLICY_VERSION,
        }),
    )
}

/// Returns the policy granting what the project needs: writing its logs,
/// reading the script asset and using the cache bucket.
///
/// The policy must not reference the project, which depends on it.
pub(crate) fn policy(
    policy_id: &str,
    role_id: &str,
    project_name: Option<&str>,
    asset_bucket: Option<&Reference>,
    cache_bucket: Option<&Reference>,
) -> ResourceDescription {
    let mut statements = vec![logs_statement(project_name)];
    if let Some(bucket) = asset_bucket {
        statements.push(bucket_statement(bucket, &["s3:GetObject*", "s3:GetBucket*", "s3:List*"]));
    }
    if let Some(bucket) = cache_bucket {
        statements.push(bucket_statement(
            bucket,
            &["s3:GetObject*", "s3:GetBucket*", "s3:List*", "s3:DeleteObject*", "s3:PutObject*", "s3:Abort*"],
        ));
    }

    ResourceDescription::new(POLICY_TYPE)
        .with("PolicyName", json!(policy_id))
        .with("PolicyDocument", json!({ "Statement": statements, "Version": POLICY_VERSION }))
        .with("Roles", json!([reference(role_id)]))
}

/// Log groups are named after the project; every build log group when the
/// name is left to the provisioning backend.
fn logs_statement(project_name: Option<&str>) -> Value {
    let log_group = join(
        "",
        vec![
            json!("arn:"),
            reference(AWS_PARTITION),
            json!(":logs:"),
            reference(AWS_REGION),
            json!(":"),
            reference(AWS_ACCOUNT_ID),
            json!(format!(":log-group:/aws/codebuild/{}", project_name.unwrap_or("*"))),
        ],
    );

    json!({
        "Action": ["logs:CreateLogGroup", "logs:CreateLogStream", "logs:PutLogEvents"],
        "Effect": "Allow",
        "Resource": [log_group.clone(), join("", vec![log_group, json!(":*")])],
    })
}

fn bucket_statement(bucket: &Reference, actions: &[&str]) -> Value {
    let arn = bucket_arn(bucket);
    json!({
        "Action": actions,
        "Effect": "Allow",
        "Resource": [arn.clone(), join("", vec![arn, json!("/*")])],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_role_arn() {
        let role = ServiceRole::Owned { role_id: "ProjectRole1234ABCD".into(), policy_id: "Policy".into() };
        assert_eq!(role.arn(), json!({"Fn::GetAtt": ["ProjectRole1234ABCD", "Arn"]}));
    }

    #[test]
    fn test_existing_role_arn() {
        let role = ServiceRole::Existing(Reference::literal("arn:aws:iam::123456789012:role/build"));
        assert_eq!(role.arn(), json!("arn:aws:iam::123456789012:role/build"));
    }

    #[test]
    fn test_trust_policy() {
        let role = role();
        assert_eq!(role.resource_type, "AWS::IAM::Role");
        assert_eq!(
            role.property("AssumeRolePolicyDocument").unwrap()["Statement"][0]["Principal"]["Service"],
            "codebuild.amazonaws.com"
        );
    }

    #[test]
    fn test_policy_statements() {
        let cache = Reference::literal("cache");
        let policy = policy("ProjectPolicy", "ProjectRole", None, None, Some(&cache));
        let statements = policy.property("PolicyDocument").unwrap()["Statement"].as_array().unwrap().clone();

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0]["Action"][0], "logs:CreateLogGroup");
        assert_eq!(statements[1]["Action"].as_array().unwrap().len(), 6);
        assert_eq!(policy.property("Roles"), Some(&json!([{"Ref": "ProjectRole"}])));
    }

    #[test]
    fn test_asset_bucket_statement() {
        let asset = Reference::to("AssetBucket");
        let policy = policy("ProjectPolicy", "ProjectRole", None, Some(&asset), None);
        let statements = policy.property("PolicyDocument").unwrap()["Statement"].as_array().unwrap().clone();

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1]["Action"], json!(["s3:GetObject*", "s3:GetBucket*", "s3:List*"]));
        assert_eq!(statements[1]["Effect"], "Allow");
        assert_eq!(statements[1]["Resource"][0], bucket_arn(&asset));
        assert_eq!(statements[1]["Resource"][1], join("", vec![bucket_arn(&asset), json!("/*")]));
    }

    #[test]
    fn test_log_group_names() {
        let statement = logs_statement(Some("nightly"));
        assert_eq!(
            statement["Resource"][0]["Fn::Join"][1].as_array().unwrap().last(),
            Some(&json!(":log-group:/aws/codebuild/nightly"))
        );

        let statement = logs_statement(None);
        assert_eq!(
            statement["Resource"][0]["Fn::Join"][1].as_array().unwrap().last(),
            Some(&json!(":log-group:/aws/codebuild/*"))
        );
    }
}
