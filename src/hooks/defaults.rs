//! Built-in base-descriptor defaults.
//!
//! Everything the base hook generates before the caller's descriptor is
//! merged in. The literals here are the platform contract: templates are
//! resolved later by the deployment tool, so strings like
//! `${self:custom.stage}` must survive verbatim.

use serde_json::{json, Map, Value};

use crate::trace::TraceConfig;

/// Service name template resolved by the deployment tool.
const SERVICE_TEMPLATE: &str = "Janis${self:custom.serviceName}Service";

/// Managed policy attached to the execution role when the service runs
/// inside a VPC.
const VPC_ACCESS_POLICY_ARN: &str =
    "arn:aws:iam::aws:policy/service-role/AWSLambdaVPCAccessExecutionRole";

/// REST-API access-log line. The gateway expects this exact compact JSON,
/// so it is kept as a literal rather than built from a value.
const ACCESS_LOG_FORMAT: &str = r#"{"date":"$context.requestTime","reqId":"$context.requestId","integReqId":"$context.integration.requestId","ip":"$context.identity.sourceIp","ua":"$context.identity.userAgent","clientCode":"$context.authorizer.clientCode","principalId":"$context.authorizer.principalId","reqMethod":"$context.httpMethod","path":"$context.resourcePath","realPath":"$context.path","status":"$context.status","authTime":"$context.authorizer.latency","resTime":"$context.responseLatency","gwError":"$context.error.message","integError":"$context.integration.error"}"#;

/// Deployment stages: (stage, human-readable name, Janis domain).
const STAGES: &[(&str, &str, &str)] = &[
    ("local", "Local", "janis.localhost"),
    ("beta", "Beta", "janisdev.in"),
    ("qa", "QA", "janisqa.in"),
    ("prod", "Prod", "janis.in"),
];

/// Packaging include globs. Caller entries are appended after these.
const INCLUDE_GLOBS: &[&str] = &["src/config/*"];

/// Packaging exclude globs. Caller entries are appended after these.
const EXCLUDE_GLOBS: &[&str] = &[
    ".nyc_output/**",
    ".bitbucket/**",
    ".deploy/**",
    ".husky/**",
    "view-schemas/**",
    "view-schemas-built/**",
    "view-schemas-built-local/**",
    "tests/**",
    "test-reports/**",
    "hooks/**",
    "events/**",
    "permissions/**",
    "schemas/src/**",
    "serverless/**",
    "src/environments/**",
    "*",
    ".*",
    "node_modules/.cache/**",
    "node_modules/**/README.md",
    "node_modules/**/.github/**",
    "node_modules/**/CHANGELOG.md",
    "node_modules/**/LICENSE",
    "node_modules/**/*.js.map",
    "node_modules/**/*.map",
    "node_modules/**/*.min.map",
    "node_modules/**/*.js.flow",
    "node_modules/**/*.d.ts",
    "node_modules/function.prototype.name/**",
    "node_modules/which-typed-array/**",
    "node_modules/is-typed-array/**",
    "mongodb/src/**",
    "bson/dist/**",
    "bson/src/**",
    "node_modules/aws-sdk/**",
    "node_modules/**/aws-sdk/**",
    "node_modules/sinon/**",
    "node_modules/serverless/**",
    "node_modules/@serverless/**",
    "node_modules/@babel/**",
    "node_modules/eslint-plugin-import/**",
    "node_modules/@sinonjs/**",
    "node_modules/faker/dist/**",
    "node_modules/date-fns/esm/**",
    "node_modules/date-fns/fp/**",
    "node_modules/**/date-fns/docs/**",
    "node_modules/**/buffer/test/**",
    "node_modules/**/jmespath/test/**",
    "node_modules/**/qs/test/**",
    "node_modules/**/qs/dist/**",
    "node_modules/**/bson/browser_build/**",
    "node_modules/**/axios/dist/browser/**",
    "node_modules/**/axios/dist/esm/**",
];

/// Default plugin list. Caller entries are appended after these.
const PLUGINS: &[&str] = &[
    "serverless-domain-manager",
    "serverless-offline",
    "serverless-api-gateway-caching",
    "serverless-plugin-stage-variables",
    "@janiscommerce/serverless-plugin-remove-authorizer-permissions",
    "serverless-plugin-split-stacks",
];

/// Gateway response template for UNAUTHORIZED (no authorizer detail yet).
const UNAUTHORIZED_TEMPLATE: &str = r#"{"message":$context.error.messageString,"authorizerErrorType":"$context.error.responseType"}"#;

/// Gateway response template carrying the authorizer's error detail.
const DETAILED_TEMPLATE: &str = r#"{"message":$context.error.messageString,"detail":"$context.authorizer.errorMessage","authorizerErrorType":"$context.error.responseType"}"#;

/// Gateway response template for integration timeouts.
const TIMEOUT_TEMPLATE: &str =
    r#"{"message":"Timeout","authorizerErrorType":"$context.error.responseType"}"#;

/// API-gateway error responses: (resource name, response type, status, template).
const GATEWAY_RESPONSES: &[(&str, &str, &str, &str)] = &[
    ("UnauthorizedResponse", "UNAUTHORIZED", "401", UNAUTHORIZED_TEMPLATE),
    ("BadRequestBodyResponse", "BAD_REQUEST_BODY", "400", DETAILED_TEMPLATE),
    ("BadRequestParameters", "BAD_REQUEST_PARAMETERS", "400", DETAILED_TEMPLATE),
    ("AccessDeniedResponse", "ACCESS_DENIED", "403", DETAILED_TEMPLATE),
    (
        "AuthorizerConfigurationErrorResponse",
        "AUTHORIZER_CONFIGURATION_ERROR",
        "500",
        DETAILED_TEMPLATE,
    ),
    ("AuthorizerFailureResponse", "AUTHORIZER_FAILURE", "500", DETAILED_TEMPLATE),
    ("IntegrationTimeoutResponse", "INTEGRATION_TIMEOUT", "504", TIMEOUT_TEMPLATE),
];

/// Inputs for one rendering of the base defaults tree.
pub(crate) struct BaseDefaults<'a> {
    pub service_code: &'a str,
    pub service_title: &'a str,
    pub service_name: &'a str,
    pub http_port: u64,
    pub lambda_port: u64,
    pub trace: Option<&'a TraceConfig>,
    pub with_vpc_policy: bool,
}

impl BaseDefaults<'_> {
    /// Render the defaults as a descriptor tree for merging.
    pub(crate) fn to_value(&self) -> Value {
        let mut descriptor = json!({
            "service": SERVICE_TEMPLATE,
            "provider": {
                "name": "aws",
                "runtime": "nodejs18.x",
                "memorySize": 1024,
                "stage": "${opt:stage, 'local'}",
                "region": "${opt:region, 'us-east-1'}",
                "role": "ServiceExecutionRole",
                "endpointType": "REGIONAL",
                "apiName": "JANIS ${param:humanReadableStage} ${self:custom.serviceTitle} API",
                "logRetentionInDays": 14,
                "environment": {
                    "JANIS_SERVICE_NAME": "${self:custom.serviceCode}",
                    "JANIS_ENV": "${self:custom.stage}",
                    "MS_PATH": "src"
                },
                "tags": {
                    "Owner": "Janis",
                    "Microservice": "${self:custom.serviceName}",
                    "Stack": "${param:humanReadableStage}"
                },
                "versionFunctions": false,
                "apiGateway": {
                    "disableDefaultEndpoint": true,
                    "minimumCompressionSize": 1024
                },
                "logs": {
                    "restApi": {
                        "accessLogging": true,
                        "executionLogging": false,
                        "level": "INFO",
                        "fullExecutionData": false,
                        "format": ACCESS_LOG_FORMAT
                    }
                }
            },
            "params": stage_params(),
            "package": {
                "individually": false,
                "include": INCLUDE_GLOBS,
                "exclude": EXCLUDE_GLOBS
            },
            "custom": {
                "serviceTitle": self.service_title,
                "serviceName": self.service_name,
                "serviceCode": self.service_code,
                "stage": "${self:provider.stage}",
                "region": "${self:provider.region}",
                "humanReadableStage": human_readable_stages(),
                "janisDomains": janis_domains(),
                "cacheEnabled": {
                    "prod": false
                },
                "customDomain": {
                    "domainName": "${self:custom.serviceCode}.${param:janisDomain}",
                    "basePath": "api",
                    "stage": "${self:custom.stage}",
                    "createRoute53Record": true,
                    "endpointType": "regional",
                    "securityPolicy": "tls_1_2"
                },
                "apiGatewayCaching": {
                    "enabled": "${self:custom.cacheEnabled.${self:custom.stage}, 'false'}",
                    "clusterSize": "0.5",
                    "ttlInSeconds": 600
                },
                "serverless-offline": {
                    "httpPort": self.http_port,
                    "lambdaPort": self.lambda_port,
                    "host": "0.0.0.0",
                    "stage": "local",
                    "noPrependStageInUrl": true,
                    "prefix": "api",
                    "reloadHandler": true
                },
                "stageVariables": {
                    "serviceName": "${self:custom.serviceCode}"
                },
                "reducer": {
                    "ignoreMissing": true
                }
            },
            "plugins": PLUGINS,
            "resources": {
                "Resources": resources()
            }
        });

        if let Some(trace) = self.trace {
            descriptor["provider"]["environment"]["JANIS_TRACE_EXTENSION_ENABLED"] =
                json!("true");
            descriptor["provider"]["layers"] = json!([trace.layer_arn()]);
        }

        if self.with_vpc_policy {
            descriptor["resources"]["Resources"]["ServiceExecutionRole"]["Properties"]
                ["ManagedPolicyArns"] = json!([VPC_ACCESS_POLICY_ARN]);
        }

        descriptor
    }
}

/// Per-stage deployment-tool params.
fn stage_params() -> Value {
    let params: Map<String, Value> = STAGES
        .iter()
        .map(|(stage, human, domain)| {
            (
                (*stage).to_string(),
                json!({
                    "humanReadableStage": human,
                    "janisDomain": domain
                }),
            )
        })
        .collect();
    Value::Object(params)
}

fn human_readable_stages() -> Value {
    let stages: Map<String, Value> = STAGES
        .iter()
        .map(|(stage, human, _)| ((*stage).to_string(), json!(human)))
        .collect();
    Value::Object(stages)
}

fn janis_domains() -> Value {
    let domains: Map<String, Value> = STAGES
        .iter()
        .map(|(stage, _, domain)| ((*stage).to_string(), json!(domain)))
        .collect();
    Value::Object(domains)
}

/// Generated CloudFormation resources: the execution role plus the
/// API-gateway error responses.
fn resources() -> Map<String, Value> {
    let mut resources = Map::new();
    resources.insert("ServiceExecutionRole".to_string(), execution_role());
    for (name, response_type, status_code, template) in GATEWAY_RESPONSES {
        resources.insert(
            (*name).to_string(),
            gateway_response(response_type, status_code, template),
        );
    }
    resources
}

fn execution_role() -> Value {
    json!({
        "Type": "AWS::IAM::Role",
        "Properties": {
            "RoleName": "Janis${self:custom.serviceName}Service-${self:custom.stage}-lambdaRole",
            "Path": "/janis-service/",
            "AssumeRolePolicyDocument": {
                "Version": "2012-10-17",
                "Statement": [
                    {
                        "Effect": "Allow",
                        "Principal": {
                            "Service": [
                                "lambda.amazonaws.com"
                            ]
                        },
                        "Action": "sts:AssumeRole"
                    }
                ]
            },
            "Policies": [
                {
                    "PolicyName": "janis-${self:custom.serviceCode}-logs-policy",
                    "PolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [
                            {
                                "Effect": "Allow",
                                "Action": [
                                    "logs:CreateLogGroup",
                                    "logs:CreateLogStream",
                                    "logs:PutLogEvents"
                                ],
                                "Resource": [
                                    log_group_arn("log-group:/aws/lambda/*:*"),
                                    log_group_arn("log-group:/aws/lambda/*:*:*")
                                ]
                            }
                        ]
                    }
                }
            ]
        }
    })
}

/// CloudFormation join producing a regional log-group ARN.
fn log_group_arn(suffix: &str) -> Value {
    json!({
        "Fn::Join": [
            ":",
            [
                "arn:aws:logs",
                { "Ref": "AWS::Region" },
                { "Ref": "AWS::AccountId" },
                suffix
            ]
        ]
    })
}

fn gateway_response(response_type: &str, status_code: &str, template: &str) -> Value {
    json!({
        "Type": "AWS::ApiGateway::GatewayResponse",
        "Properties": {
            "ResponseParameters": {
                "gatewayresponse.header.Access-Control-Allow-Origin": "method.request.header.Origin"
            },
            "ResponseTemplates": {
                "application/json": template
            },
            "ResponseType": response_type,
            "RestApiId": {
                "Ref": "ApiGatewayRestApi"
            },
            "StatusCode": status_code
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> BaseDefaults<'static> {
        BaseDefaults {
            service_code: "testing",
            service_title: "Testing",
            service_name: "Testing",
            http_port: 3000,
            lambda_port: 23000,
            trace: None,
            with_vpc_policy: false,
        }
    }

    #[test]
    fn test_to_value_core_fields() {
        let value = defaults().to_value();

        assert_eq!(value["service"], "Janis${self:custom.serviceName}Service");
        assert_eq!(value["provider"]["memorySize"], 1024);
        assert_eq!(value["provider"]["runtime"], "nodejs18.x");
        assert_eq!(value["custom"]["serviceCode"], "testing");
        assert_eq!(value["custom"]["serverless-offline"]["httpPort"], 3000);
        assert_eq!(value["custom"]["serverless-offline"]["lambdaPort"], 23000);
        assert_eq!(value["params"]["qa"]["janisDomain"], "janisqa.in");
    }

    #[test]
    fn test_resources_table() {
        let value = defaults().to_value();
        let resources = value["resources"]["Resources"].as_object().unwrap();

        // The role plus the seven gateway responses.
        assert_eq!(resources.len(), 8);
        assert_eq!(resources["ServiceExecutionRole"]["Type"], "AWS::IAM::Role");
        assert_eq!(
            resources["IntegrationTimeoutResponse"]["Properties"]["StatusCode"],
            "504"
        );
        assert!(resources["ServiceExecutionRole"]["Properties"]
            .get("ManagedPolicyArns")
            .is_none());
    }

    #[test]
    fn test_vpc_policy_attached() {
        let value = BaseDefaults {
            with_vpc_policy: true,
            ..defaults()
        }
        .to_value();

        assert_eq!(
            value["resources"]["Resources"]["ServiceExecutionRole"]["Properties"]
                ["ManagedPolicyArns"],
            serde_json::json!([VPC_ACCESS_POLICY_ARN])
        );
    }

    #[test]
    fn test_trace_extension_wired() {
        let trace = crate::trace::TraceConfig {
            account_id: "012345678910".to_string(),
            extension_version: "1".to_string(),
        };
        let value = BaseDefaults {
            trace: Some(&trace),
            ..defaults()
        }
        .to_value();

        assert_eq!(
            value["provider"]["environment"]["JANIS_TRACE_EXTENSION_ENABLED"],
            "true"
        );
        assert_eq!(
            value["provider"]["layers"],
            serde_json::json!(["arn:aws:lambda:${aws:region}:012345678910:layer:trace:1"])
        );
    }
}
