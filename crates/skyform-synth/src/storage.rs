//! S3 bucket declarations
//!
//! Every configured bucket is versioned, SSE-S3 encrypted, blocked from
//! all public access, and retained when its declaration disappears.
//! Entries without a `bucket_name` are skipped with a warning instead of
//! aborting the run.

use crate::error::Result;
use crate::naming::logical_id;
use crate::stack::Stack;
use crate::template::{self, Output, Resource};
use serde_json::json;
use skyform_config::BucketConfig;
use tracing::{info, warn};

/// Builds the S3 bucket resources for one environment
pub struct StorageBuilder<'a> {
    env_name: &'a str,
    buckets: &'a [BucketConfig],
}

impl<'a> StorageBuilder<'a> {
    pub fn new(env_name: &'a str, buckets: &'a [BucketConfig]) -> Self {
        Self { env_name, buckets }
    }

    pub fn build(&self, stack: &mut Stack) -> Result<()> {
        for bucket in self.buckets {
            let Some(bucket_name) = bucket.bucket_name.as_deref() else {
                warn!(
                    env = self.env_name,
                    "skipping s3 entry without a bucket_name"
                );
                continue;
            };

            let id = logical_id(bucket_name);
            let resource = Resource::new(
                "AWS::S3::Bucket",
                json!({
                    "BucketName": bucket_name,
                    "VersioningConfiguration": { "Status": "Enabled" },
                    "BucketEncryption": {
                        "ServerSideEncryptionConfiguration": [
                            { "ServerSideEncryptionByDefault": { "SSEAlgorithm": "AES256" } }
                        ]
                    },
                    "PublicAccessBlockConfiguration": {
                        "BlockPublicAcls": true,
                        "BlockPublicPolicy": true,
                        "IgnorePublicAcls": true,
                        "RestrictPublicBuckets": true
                    }
                }),
            )
            .retain();

            stack.add_resource(&id, resource);

            stack.add_output(
                format!("{id}Name"),
                Output::new(
                    template::reference(&id),
                    format!(
                        "Name of S3 bucket {bucket_name} for {} environment",
                        self.env_name
                    ),
                ),
            );
            stack.add_output(
                format!("{id}Arn"),
                Output::new(
                    template::get_att(&id, "Arn"),
                    format!(
                        "ARN of S3 bucket {bucket_name} for {} environment",
                        self.env_name
                    ),
                ),
            );

            info!(bucket = bucket_name, id = %id, "bucket declared");
        }

        Ok(())
    }
}
